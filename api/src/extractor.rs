use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use registry::AppRegistry;
use shared::error::AppError;

// 管理側のルートを保護する編集権限チェック。
// Authorization: Bearer <ADMIN_TOKEN> の共有トークンを要求する
pub struct AuthorizedEditor;

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthenticated)?;

        if token != registry.app_config().auth.editor_token {
            return Err(AppError::Unauthenticated);
        }

        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use axum::http::Request;

    fn parts_with_authorization(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/admin/registrations");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn accepts_the_configured_editor_token() {
        let registry = testing::default_registry();
        let mut parts = parts_with_authorization(Some("Bearer test-admin-token"));
        assert!(AuthorizedEditor::from_request_parts(&mut parts, &registry)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn rejects_missing_or_wrong_tokens() {
        let registry = testing::default_registry();

        let mut parts = parts_with_authorization(None);
        assert!(matches!(
            AuthorizedEditor::from_request_parts(&mut parts, &registry).await,
            Err(AppError::Unauthenticated)
        ));

        let mut parts = parts_with_authorization(Some("Bearer wrong"));
        assert!(matches!(
            AuthorizedEditor::from_request_parts(&mut parts, &registry).await,
            Err(AppError::Unauthenticated)
        ));

        let mut parts = parts_with_authorization(Some("test-admin-token"));
        assert!(matches!(
            AuthorizedEditor::from_request_parts(&mut parts, &registry).await,
            Err(AppError::Unauthenticated)
        ));
    }
}
