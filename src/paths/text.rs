use crate::core::{Language, Role};

/// Код строки интерфейса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextId {
    SiteName,
    Home,
    IndexTitle,
    IndexBody,
    LoginTitle,
    LoginUserName,
    LoginPassword,
    LoginSubmit,
    LoginReset,
    LoggedInTitle,
    LoggedInAs,
    LogoutPrefix,
    LogoutLink,
    LogoutSuffix,
    LoginFailureTitle,
    AlreadyLoggedIn,
    LoginIncorrect,
    LoginUserNameRequired,
    LoginPasswordRequired,
    LoggedOutTitle,
    LoggedOutBody,
    DashboardTitle,
    DashboardLoggedInAs,
    DashboardRoles,
    DashboardLinkView,
    DashboardLinkSettings,
    DashboardLinkManagement,
    DashboardLinkAdminister,
    ManagementTitle,
    AdministerTitle,
    UserViewTitle,
    UserViewTitleNamed,
    UserSettingsTitle,
    SectionAccount,
    SectionPersonal,
    SectionAccess,
    SectionHistory,
    FieldId,
    FieldIdExternal,
    FieldNameMachine,
    FieldEmail,
    FieldNamePrefix,
    FieldNameFirst,
    FieldNameMiddle,
    FieldNameLast,
    FieldNameSuffix,
    FieldNameComplete,
    FieldCreated,
    FieldChanged,
    FieldLocked,
    NotFoundTitle,
    NotFoundBody,
    AccessDeniedTitle,
    AccessDeniedBody,
    BadMethodTitle,
    BadMethodBody,
    ServerErrorTitle,
    ServerErrorBody,
}

/// Строка интерфейса на выбранном языке; `@{user}` подставляет вызывающий
#[must_use]
pub const fn text(language: Language, id: TextId) -> &'static str {
    match language {
        Language::English => english(id),
        Language::Japanese => japanese(id),
    }
}

/// Строка с подстановкой `@{user}`
#[must_use]
pub fn text_with_user(language: Language, id: TextId, user: &str) -> String {
    text(language, id).replace("@{user}", user)
}

#[must_use]
pub const fn role_name(language: Language, role: Role) -> &'static str {
    match language {
        Language::English => match role {
            Role::Public => "Public",
            Role::System => "System",
            Role::User => "User",
            Role::Requester => "Requester",
            Role::Drafter => "Drafter",
            Role::Editor => "Editor",
            Role::Reviewer => "Reviewer",
            Role::Financer => "Financer",
            Role::Insurer => "Insurer",
            Role::Publisher => "Publisher",
            Role::Auditor => "Auditor",
            Role::Manager => "Manager",
            Role::Administer => "Administer",
        },
        Language::Japanese => match role {
            Role::Public => "パブリック",
            Role::System => "システム",
            Role::User => "ユーザー",
            Role::Requester => "リクエスタ",
            Role::Drafter => "ドレイター",
            Role::Editor => "編集者",
            Role::Reviewer => "レビューア",
            Role::Financer => "ファイナンサー",
            Role::Insurer => "保険会社",
            Role::Publisher => "出版社",
            Role::Auditor => "審査員",
            Role::Manager => "マネージャー",
            Role::Administer => "管理者",
        },
    }
}

const fn english(id: TextId) -> &'static str {
    match id {
        TextId::SiteName => "Standard System",
        TextId::Home => "Home",
        TextId::IndexTitle => "Standard System",
        TextId::IndexBody => "This is the standard system index page.",
        TextId::LoginTitle => "Login to System",
        TextId::LoginUserName => "Username",
        TextId::LoginPassword => "Password",
        TextId::LoginSubmit => "Login",
        TextId::LoginReset => "Reset",
        TextId::LoggedInTitle => "Logged In",
        TextId::LoggedInAs => "You are currently logged in to the system as @{user}.",
        TextId::LogoutPrefix => "You may ",
        TextId::LogoutLink => "logout",
        TextId::LogoutSuffix => " at any time.",
        TextId::LoginFailureTitle => "Login Failure",
        TextId::AlreadyLoggedIn => "You are already logged in.",
        TextId::LoginIncorrect => "Unable to login, an incorrect user name or password has been specified.",
        TextId::LoginUserNameRequired => "No valid username has been supplied.",
        TextId::LoginPasswordRequired => "No password has been supplied.",
        TextId::LoggedOutTitle => "You Have Logged Out",
        TextId::LoggedOutBody => "You have been logged out of the system.",
        TextId::DashboardTitle => "Dashboard",
        TextId::DashboardLoggedInAs => "You are currently logged in as: @{user}.",
        TextId::DashboardRoles => "You are currently assigned the following roles:",
        TextId::DashboardLinkView => "View Profile",
        TextId::DashboardLinkSettings => "Settings",
        TextId::DashboardLinkManagement => "Management",
        TextId::DashboardLinkAdminister => "Administration",
        TextId::ManagementTitle => "Management Dashboard",
        TextId::AdministerTitle => "Administration Dashboard",
        TextId::UserViewTitle => "View User",
        TextId::UserViewTitleNamed => "View User: @{user}",
        TextId::UserSettingsTitle => "User Settings",
        TextId::SectionAccount => "Account Information",
        TextId::SectionPersonal => "Personal Information",
        TextId::SectionAccess => "Access Information",
        TextId::SectionHistory => "History Information",
        TextId::FieldId => "ID",
        TextId::FieldIdExternal => "External ID",
        TextId::FieldNameMachine => "Username",
        TextId::FieldEmail => "E-mail",
        TextId::FieldNamePrefix => "Prefix",
        TextId::FieldNameFirst => "First Name",
        TextId::FieldNameMiddle => "Middle Name",
        TextId::FieldNameLast => "Last Name",
        TextId::FieldNameSuffix => "Suffix",
        TextId::FieldNameComplete => "Full Name",
        TextId::FieldCreated => "Created",
        TextId::FieldChanged => "Changed",
        TextId::FieldLocked => "Locked",
        TextId::NotFoundTitle => "Page Not Found",
        TextId::NotFoundBody => "The page you requested is not available.",
        TextId::AccessDeniedTitle => "Access Denied",
        TextId::AccessDeniedBody => "You are not authorized to access this resource.",
        TextId::BadMethodTitle => "Bad Method",
        TextId::BadMethodBody => "The provided HTTP request method is either unsupported or invalid for the request path.",
        TextId::ServerErrorTitle => "Server Error",
        TextId::ServerErrorBody => "Something went wrong while processing your request, please try again later.",
    }
}

const fn japanese(id: TextId) -> &'static str {
    match id {
        TextId::SiteName | TextId::IndexTitle => "標準システム",
        TextId::Home => "ホームページ",
        TextId::IndexBody => "これは標準のシステムインデックスページです。",
        TextId::LoginTitle => "システムへのログイン",
        TextId::LoginUserName => "ユーザー名",
        TextId::LoginPassword => "パスワード",
        TextId::LoginSubmit => "ログイン",
        TextId::LoginReset => "フォームをリセット",
        TextId::LoggedInTitle => "ログインした",
        TextId::LoggedInAs => "現在、システムに@{user}としてログインしています。",
        TextId::LogoutPrefix => "いつでも",
        TextId::LogoutLink => "ログアウト",
        TextId::LogoutSuffix => "してもいいです。",
        TextId::LoginFailureTitle => "ログイン失敗",
        TextId::AlreadyLoggedIn => "あなたは既にログインしています。",
        TextId::LoginIncorrect => "ログインできません。間違ったユーザー名またはパスワードが指定されています。",
        TextId::LoginUserNameRequired => "有効なユーザー名が指定されていません。",
        TextId::LoginPasswordRequired => "パスワードが指定されていません。",
        TextId::LoggedOutTitle => "あなたはログアウトしました",
        TextId::LoggedOutBody => "あなたはシステムからログアウトされています。",
        TextId::DashboardTitle => "ダッシュボード",
        TextId::DashboardLoggedInAs => "現在、@{user}としてログインしています。",
        TextId::DashboardRoles => "現在、次の役割が割り当てられています：",
        TextId::DashboardLinkView => "プロフィールを見る",
        TextId::DashboardLinkSettings => "設定",
        TextId::DashboardLinkManagement => "管理",
        TextId::DashboardLinkAdminister => "システム管理",
        TextId::ManagementTitle => "管理ダッシュボード",
        TextId::AdministerTitle => "ダッシュボードの管理",
        TextId::UserViewTitle => "ユーザーを表示",
        TextId::UserViewTitleNamed => "ユーザーを表示: @{user}",
        TextId::UserSettingsTitle => "ユーザー設定",
        TextId::SectionAccount => "アカウント情報",
        TextId::SectionPersonal => "個人情報",
        TextId::SectionAccess => "アクセス情報",
        TextId::SectionHistory => "履歴情報",
        TextId::FieldId => "ID",
        TextId::FieldIdExternal => "外部ID",
        TextId::FieldNameMachine => "ユーザー名",
        TextId::FieldEmail => "Eメール",
        TextId::FieldNamePrefix => "接頭辞",
        TextId::FieldNameFirst => "名",
        TextId::FieldNameMiddle => "ミドルネーム",
        TextId::FieldNameLast => "姓",
        TextId::FieldNameSuffix => "接尾辞",
        TextId::FieldNameComplete => "氏名",
        TextId::FieldCreated => "作成日",
        TextId::FieldChanged => "変更日",
        TextId::FieldLocked => "ロック日",
        TextId::NotFoundTitle => "見つかりません",
        TextId::NotFoundBody => "リクエストしたページは利用できません。",
        TextId::AccessDeniedTitle => "アクセス拒否",
        TextId::AccessDeniedBody => "このリソースにアクセスする権限がありません。",
        TextId::BadMethodTitle => "悪い方法",
        TextId::BadMethodBody => "指定されたHTTP要求メソッドは、要求パスに対してサポートされていないか無効です。",
        TextId::ServerErrorTitle => "サーバーエラー",
        TextId::ServerErrorBody => "リクエストの処理中に問題が発生しました。しばらくしてからもう一度お試しください。",
    }
}
