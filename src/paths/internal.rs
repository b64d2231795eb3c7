use super::handler::{Context, Executed, Output, PathHandler, PathId};
use super::text::TextId;
use crate::core::Result;
use crate::markup::{Crumb, Tag, TagType};
use async_trait::async_trait;
use axum::http::{Method, StatusCode, header};

fn message_page(ctx: &Context<'_>, title: TextId, body: TextId, status: StatusCode) -> Executed {
    let title = ctx.text(title);
    let breadcrumbs = vec![ctx.home_crumb(), Crumb::new(title, None)];
    let content = vec![Tag::text(TagType::Paragraph, ctx.text(body)).with_class("message")];
    Executed::markup(ctx.document(title, breadcrumbs, content)).with_status(status)
}

#[must_use]
pub fn not_found(ctx: &Context<'_>) -> Executed {
    message_page(ctx, TextId::NotFoundTitle, TextId::NotFoundBody, StatusCode::NOT_FOUND)
}

#[must_use]
pub fn access_denied(ctx: &Context<'_>) -> Executed {
    message_page(ctx, TextId::AccessDeniedTitle, TextId::AccessDeniedBody, StatusCode::FORBIDDEN)
}

#[must_use]
pub fn bad_method(ctx: &Context<'_>) -> Executed {
    message_page(ctx, TextId::BadMethodTitle, TextId::BadMethodBody, StatusCode::METHOD_NOT_ALLOWED)
}

#[must_use]
pub fn server_error(ctx: &Context<'_>) -> Executed {
    message_page(ctx, TextId::ServerErrorTitle, TextId::ServerErrorBody, StatusCode::INTERNAL_SERVER_ERROR)
}

/// Ответ на OPTIONS: пустое тело и список методов в `Allow`
#[must_use]
pub fn options(methods: &[Method]) -> Executed {
    let allow = methods.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
    Executed::new(Output::File { content_type: "text/plain; charset=utf-8".to_string(), bytes: Vec::new() })
        .with_header(header::ALLOW, allow)
}

/// Главная страница
pub struct Index;

#[async_trait]
impl PathHandler for Index {
    fn id(&self) -> PathId {
        PathId::Index
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed> {
        let content = vec![Tag::text(TagType::Paragraph, ctx.text(TextId::IndexBody))];
        let breadcrumbs = vec![Crumb::new(ctx.text(TextId::Home), None)];
        Ok(Executed::markup(ctx.document(ctx.text(TextId::IndexTitle), breadcrumbs, content)))
    }
}
