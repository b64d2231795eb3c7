use super::handler::{Context, Executed, PathHandler, PathId};
use crate::core::Result;
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

/// `s/form_id`: одноразовый идентификатор формы для AJAX-клиентов
pub struct SubmitFormId;

#[async_trait]
impl PathHandler for SubmitFormId {
    fn id(&self) -> PathId {
        PathId::SubmitFormId
    }

    async fn execute(&self, _ctx: &mut Context<'_>) -> Result<Executed> {
        Ok(Executed::ajax(json!({ "form_id": Uuid::new_v4().to_string() })))
    }
}
