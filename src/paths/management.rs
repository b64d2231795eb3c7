use super::handler::{Context, Executed, PathHandler, PathId};
use super::text::TextId;
use crate::core::{Result, SiteError, User};
use crate::markup::{Crumb, Tag, TagType};
use async_trait::async_trait;

fn dashboard(ctx: &Context<'_>, title: TextId) -> Executed {
    let title = ctx.text(title);
    let breadcrumbs = vec![ctx.home_crumb(), Crumb::new(title, None)];
    let content = vec![
        Tag::new(TagType::UnorderedList)
            .with_id("links")
            .with_child(Tag::new(TagType::ListItem).with_child(Tag::link(
                ctx.url("u/dashboard"),
                ctx.text(TextId::DashboardTitle),
            ))),
    ];
    Executed::markup(ctx.document(title, breadcrumbs, content))
}

/// `m/dashboard`
pub struct ManagementDashboard;

#[async_trait]
impl PathHandler for ManagementDashboard {
    fn id(&self) -> PathId {
        PathId::ManagementDashboard
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        if !ctx.session.user_current().is_some_and(User::is_manager) {
            return Err(SiteError::AccessDenied(ctx.path.clone()));
        }
        Ok(dashboard(ctx, TextId::ManagementTitle))
    }
}

/// `a/dashboard`
pub struct AdministerDashboard;

#[async_trait]
impl PathHandler for AdministerDashboard {
    fn id(&self) -> PathId {
        PathId::AdministerDashboard
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        if !ctx.session.user_current().is_some_and(User::is_administer) {
            return Err(SiteError::AccessDenied(ctx.path.clone()));
        }
        Ok(dashboard(ctx, TextId::AdministerTitle))
    }
}
