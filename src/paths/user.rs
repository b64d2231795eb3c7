use super::handler::{Context, Executed, PathHandler, PathId};
use super::text::{TextId, role_name, text_with_user};
use crate::core::{ErrorCode, Result, Role, SiteError, User};
use crate::database::{ConnectionString, LogType, log_user};
use crate::markup::{Crumb, Document, Tag, TagType};
use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

pub const LOGIN_FORM_ID: &str = "login_form";
pub const FIELD_USER_NAME: &str = "login_form-user_name";
pub const FIELD_PASSWORD: &str = "login_form-password";

/// Наименьший идентификатор обычной учётной записи; младшие заняты системой
const USER_ID_MINIMUM: i64 = 1000;

fn user_crumb(ctx: &Context<'_>, title: &str) -> Vec<Crumb> {
    vec![ctx.home_crumb(), Crumb::new(title, None)]
}

fn input(kind: &str, name: &str, label: &str) -> Tag {
    Tag::new(TagType::Division)
        .with_class("form_field")
        .with_child(Tag::text(TagType::Label, label).with_attribute("for", name))
        .with_child(
            Tag::new(TagType::Input)
                .with_id(name)
                .with_attribute("type", kind)
                .with_attribute("name", name),
        )
}

/// Форма входа; `problems` выводятся над полями
#[must_use]
pub fn login_form(ctx: &Context<'_>, problems: &[TextId]) -> Document {
    let mut form = Tag::new(TagType::Form)
        .with_id(LOGIN_FORM_ID)
        .with_attribute("method", "post")
        .with_attribute("action", ctx.url("u/login"))
        .with_child(
            Tag::new(TagType::Input)
                .with_attribute("type", "hidden")
                .with_attribute("name", "form_id")
                .with_attribute("value", LOGIN_FORM_ID),
        );

    if !problems.is_empty() {
        let items = problems.iter().map(|problem| Tag::text(TagType::ListItem, ctx.text(*problem)));
        form.push_child(Tag::new(TagType::UnorderedList).with_class("problems").with_children(items));
    }

    form.push_child(input("text", FIELD_USER_NAME, ctx.text(TextId::LoginUserName)));
    form.push_child(input("password", FIELD_PASSWORD, ctx.text(TextId::LoginPassword)));
    form.push_child(
        Tag::text(TagType::Button, ctx.text(TextId::LoginReset))
            .with_attribute("type", "reset")
            .with_attribute("name", "login_form-reset"),
    );
    form.push_child(
        Tag::text(TagType::Button, ctx.text(TextId::LoginSubmit))
            .with_attribute("type", "submit")
            .with_attribute("name", "login_form-login"),
    );

    let title = ctx.text(TextId::LoginTitle);
    ctx.document(title, user_crumb(ctx, title), vec![form])
}

fn logged_in_page(ctx: &Context<'_>) -> Executed {
    let title = ctx.text(TextId::LoggedInTitle);
    let content = vec![
        Tag::text(TagType::Paragraph, text_with_user(ctx.language, TextId::LoggedInAs, &ctx.user_label())),
        Tag::new(TagType::Paragraph)
            .with_child(Tag::text(TagType::Span, ctx.text(TextId::LogoutPrefix)))
            .with_child(Tag::link(ctx.url("u/logout"), ctx.text(TextId::LogoutLink)))
            .with_child(Tag::text(TagType::Span, ctx.text(TextId::LogoutSuffix))),
    ];
    Executed::markup(ctx.document(title, user_crumb(ctx, title), content))
}

fn already_logged_in_page(ctx: &Context<'_>) -> Executed {
    let title = ctx.text(TextId::LoginFailureTitle);
    let content = vec![Tag::text(TagType::Paragraph, ctx.text(TextId::AlreadyLoggedIn)).with_class("message")];
    Executed::markup(ctx.document(title, user_crumb(ctx, title), content)).with_status(StatusCode::FORBIDDEN)
}

/// `u/login`
pub struct UserLogin;

impl UserLogin {
    async fn do_login(ctx: &mut Context<'_>, user_name: &str, password: &str) -> Result<Executed> {
        ctx.database.disconnect().await?;

        let connection = ConnectionString::new(&ctx.settings.database, user_name, Some(password));
        match ctx.database.connect(&connection).await {
            Ok(()) => {
                ctx.session.do_login(ctx.store, user_name, password, &ctx.settings.session).await?;
                match ctx.database.load_user_current().await {
                    Ok(user) => ctx.session.set_user_current(user),
                    Err(e) => warn!(user = %user_name, "Failed to load the current user: {}", e),
                }

                let event = LogType::Connect { expires: ctx.session.timeout() };
                if let Err(e) = log_user(&mut *ctx.database, ctx.request, &event, StatusCode::SEE_OTHER.as_u16()).await {
                    warn!("Failed to log user connect: {}", e);
                }

                info!(user = %user_name, "logged in");
                Ok(Executed::redirect(ctx.url("u/dashboard"), StatusCode::SEE_OTHER))
            }
            Err(e) if e.code() == ErrorCode::PostgresqlConnectionFailure => {
                warn!(user = %user_name, "Login failed: {}", e);

                if ctx.settings.database.user_public_default {
                    let public = ConnectionString::public(&ctx.settings.database);
                    if let Err(e) = ctx.database.connect(&public).await {
                        warn!("Failed to reconnect as the public user: {}", e);
                    }
                }
                if ctx.database.is_connected() {
                    let event = LogType::Failure { user_name: user_name.to_string() };
                    if let Err(e) =
                        log_user(&mut *ctx.database, ctx.request, &event, StatusCode::FORBIDDEN.as_u16()).await
                    {
                        warn!("Failed to log login failure: {}", e);
                    }
                }

                Ok(Executed::markup(login_form(ctx, &[TextId::LoginIncorrect])).with_status(StatusCode::FORBIDDEN))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PathHandler for UserLogin {
    fn id(&self) -> PathId {
        PathId::Login
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        let posted = ctx.request.method() == Method::POST;

        if ctx.session.is_logged_in() {
            return Ok(if posted { already_logged_in_page(ctx) } else { logged_in_page(ctx) });
        }

        if !posted {
            return Ok(Executed::markup(login_form(ctx, &[])));
        }

        let user_name = ctx.request.form_value(FIELD_USER_NAME).unwrap_or_default().trim().to_string();
        let password = ctx.request.form_value(FIELD_PASSWORD).unwrap_or_default().to_string();

        let mut problems = Vec::new();
        if user_name.is_empty() || user_name == ctx.settings.database.user_public {
            problems.push(TextId::LoginUserNameRequired);
        }
        if password.is_empty() {
            problems.push(TextId::LoginPasswordRequired);
        }
        if !problems.is_empty() {
            return Ok(Executed::markup(login_form(ctx, &problems)).with_status(StatusCode::FORBIDDEN));
        }

        Self::do_login(ctx, &user_name, &password).await
    }
}

/// `u/logout`
pub struct UserLogout;

#[async_trait]
impl PathHandler for UserLogout {
    fn id(&self) -> PathId {
        PathId::Logout
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        let user_name = ctx.session.name().unwrap_or_default().to_string();

        if ctx.database.is_connected() {
            if let Err(e) = log_user(&mut *ctx.database, ctx.request, &LogType::Disconnect, StatusCode::OK.as_u16()).await
            {
                warn!("Failed to log user disconnect: {}", e);
            }
        }
        ctx.session.do_logout(ctx.store).await?;
        info!(user = %user_name, "logged out");

        let title = ctx.text(TextId::LoggedOutTitle);
        let content = vec![Tag::text(TagType::Paragraph, ctx.text(TextId::LoggedOutBody))];
        Ok(Executed::markup(ctx.document(title, user_crumb(ctx, title), content)))
    }
}

fn current_user(ctx: &Context<'_>) -> Result<User> {
    ctx.session.user_current().cloned().ok_or(SiteError::NoSession)
}

/// `u/dashboard`
pub struct UserDashboard;

#[async_trait]
impl PathHandler for UserDashboard {
    fn id(&self) -> PathId {
        PathId::UserDashboard
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        let user = current_user(ctx)?;

        let roles = user
            .roles
            .iter()
            .map(|role| Tag::text(TagType::ListItem, role_name(ctx.language, role)).with_class(role.name()));

        let mut links = vec![
            (TextId::DashboardLinkView, "u/view"),
            (TextId::DashboardLinkSettings, "u/settings"),
        ];
        if user.is_manager() {
            links.push((TextId::DashboardLinkManagement, "m/dashboard"));
        }
        if user.is_administer() {
            links.push((TextId::DashboardLinkAdminister, "a/dashboard"));
        }
        links.push((TextId::LogoutLink, "u/logout"));
        let links = links
            .into_iter()
            .map(|(label, path)| Tag::new(TagType::ListItem).with_child(Tag::link(ctx.url(path), ctx.text(label))));

        let content = vec![
            Tag::text(
                TagType::Paragraph,
                text_with_user(ctx.language, TextId::DashboardLoggedInAs, &user.display_name()),
            ),
            Tag::text(TagType::Paragraph, ctx.text(TextId::DashboardRoles)),
            Tag::new(TagType::UnorderedList).with_id("roles").with_children(roles),
            Tag::new(TagType::UnorderedList).with_id("links").with_children(links),
        ];

        let title = ctx.text(TextId::DashboardTitle);
        Ok(Executed::markup(ctx.document(title, user_crumb(ctx, title), content)))
    }
}

/// Идентификатор из `u/view/<id>`; второй аргумент не поддерживается
fn requested_user_id(ctx: &Context<'_>) -> Result<Option<i64>> {
    let not_found = || SiteError::NotFoundPath(ctx.path.clone());
    match ctx.arguments.as_slice() {
        [] => Ok(None),
        [id] => {
            let id = id.parse::<i64>().map_err(|_| not_found())?;
            if id < USER_ID_MINIMUM {
                return Err(not_found());
            }
            Ok(Some(id))
        }
        _ => Err(not_found()),
    }
}

async fn target_user(ctx: &mut Context<'_>) -> Result<User> {
    match requested_user_id(ctx)? {
        None => current_user(ctx),
        Some(id) if ctx.session.user_current().is_some_and(|user| user.id == id) => current_user(ctx),
        Some(id) => ctx
            .database
            .load_user(id)
            .await?
            .ok_or_else(|| SiteError::NotFoundPath(ctx.path.clone())),
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> Option<String> {
    date.map(|date| date.format("%Y/%m/%d %H:%M:%S").to_string())
}

type Field = (TextId, &'static str, Option<String>);

/// Поля учётной записи по разделам: подпись, имя поля формы и значение
fn user_fields(user: &User) -> Vec<(TextId, Vec<Field>)> {
    vec![
        (
            TextId::SectionAccount,
            vec![
                (TextId::FieldId, "id", Some(user.id.to_string())),
                (TextId::FieldIdExternal, "id_external", user.id_external.map(|id| id.to_string())),
                (TextId::FieldNameMachine, "name_machine", Some(user.name_machine.clone())),
                (TextId::FieldEmail, "address_email", user.address_email.clone()),
            ],
        ),
        (
            TextId::SectionPersonal,
            vec![
                (TextId::FieldNamePrefix, "name_human-prefix", user.name_human.prefix.clone()),
                (TextId::FieldNameFirst, "name_human-first", user.name_human.first.clone()),
                (TextId::FieldNameMiddle, "name_human-middle", user.name_human.middle.clone()),
                (TextId::FieldNameLast, "name_human-last", user.name_human.last.clone()),
                (TextId::FieldNameSuffix, "name_human-suffix", user.name_human.suffix.clone()),
                (TextId::FieldNameComplete, "name_human-complete", user.name_human.complete.clone()),
            ],
        ),
        (
            TextId::SectionHistory,
            vec![
                (TextId::FieldCreated, "date_created", format_date(user.dates.created)),
                (TextId::FieldChanged, "date_changed", format_date(user.dates.changed)),
                (TextId::FieldLocked, "date_locked", format_date(user.dates.locked)),
            ],
        ),
    ]
}

fn access_section(ctx: &Context<'_>, user: &User) -> Tag {
    let roles = Role::ALL.into_iter().filter(|role| user.has_role(*role)).map(|role| {
        Tag::text(TagType::ListItem, role_name(ctx.language, role)).with_class(role.name())
    });
    Tag::new(TagType::Section)
        .with_id("access")
        .with_child(Tag::text(TagType::Heading3, ctx.text(TextId::SectionAccess)))
        .with_child(Tag::new(TagType::UnorderedList).with_class("roles").with_children(roles))
}

/// `u/view[/id]`
pub struct UserView;

#[async_trait]
impl PathHandler for UserView {
    fn id(&self) -> PathId {
        PathId::UserView
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        let user = target_user(ctx).await?;

        let mut content = Vec::new();
        for (section, fields) in user_fields(&user) {
            let items = fields.into_iter().flat_map(|(label, _, value)| {
                [
                    Tag::text(TagType::DefinitionTerm, ctx.text(label)),
                    Tag::text(TagType::Definition, value.unwrap_or_default()),
                ]
            });
            content.push(
                Tag::new(TagType::Section)
                    .with_class("user_section")
                    .with_child(Tag::text(TagType::Heading3, ctx.text(section)))
                    .with_child(Tag::new(TagType::DefinitionList).with_children(items)),
            );
        }
        content.insert(2, access_section(ctx, &user));

        let title = text_with_user(ctx.language, TextId::UserViewTitleNamed, &user.display_name());
        let breadcrumbs = user_crumb(ctx, ctx.text(TextId::UserViewTitle));
        Ok(Executed::markup(ctx.document(title, breadcrumbs, content)))
    }
}

/// `u/settings[/id]`: поля учётной записи в форме только для чтения
pub struct UserSettings;

#[async_trait]
impl PathHandler for UserSettings {
    fn id(&self) -> PathId {
        PathId::UserSettings
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        let user = target_user(ctx).await?;

        let mut form = Tag::new(TagType::Form).with_id("user_settings").with_attribute("method", "post");
        for (section, fields) in user_fields(&user) {
            let mut fieldset =
                Tag::new(TagType::FieldSet).with_child(Tag::text(TagType::Legend, ctx.text(section)));
            for (label, field, value) in fields {
                let name = format!("user_settings-{field}");
                fieldset.push_child(
                    Tag::new(TagType::Division)
                        .with_class("form_field")
                        .with_child(Tag::text(TagType::Label, ctx.text(label)).with_attribute("for", name.clone()))
                        .with_child(
                            Tag::new(TagType::Input)
                                .with_id(name.clone())
                                .with_attribute("type", "text")
                                .with_attribute("name", name)
                                .with_attribute("value", value.unwrap_or_default())
                                .with_attribute("readonly", "readonly"),
                        ),
                );
            }
            form.push_child(fieldset);
        }

        let title = ctx.text(TextId::UserSettingsTitle);
        Ok(Executed::markup(ctx.document(title, user_crumb(ctx, title), vec![form, access_section(ctx, &user)])))
    }
}

/// `u/session`: состояние сессии для клиентских скриптов
pub struct UserSession;

#[async_trait]
impl PathHandler for UserSession {
    fn id(&self) -> PathId {
        PathId::UserSession
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        Ok(Executed::ajax(json!({
            "logged_in": ctx.session.is_logged_in(),
            "expired": ctx.session.is_expired(),
            "timeout": ctx.session.timeout(),
            "user": ctx.session.name(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_fields_sections() {
        let mut user = User::new(1001, "jdoe");
        user.address_email = Some("jdoe@example.org".into());
        let sections = user_fields(&user);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].0, TextId::SectionAccount);
        assert_eq!(sections[0].1[0], (TextId::FieldId, "id", Some("1001".to_string())));
        assert_eq!(sections[0].1[3], (TextId::FieldEmail, "address_email", Some("jdoe@example.org".to_string())));
    }

    #[test]
    fn test_format_date() {
        let date = DateTime::parse_from_rfc3339("2017-05-01T10:00:00+00:00").unwrap().with_timezone(&Utc);
        assert_eq!(format_date(Some(date)).as_deref(), Some("2017/05/01 10:00:00"));
        assert_eq!(format_date(None), None);
    }
}
