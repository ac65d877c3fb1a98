use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::model::UserProfile;
use crate::protocol::{
    ForgotPasswordRequest, LoginRequest, RefreshTokenResponse, ResetPasswordRequest,
};
use crate::request::{HttpClient, HttpMethod};
use crate::session::{KeyValueStore, SessionStore};

pub struct AuthService<'a, C: HttpClient> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> AuthService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    /// 登录成功后写入会话并记住邮箱
    pub async fn login<S: KeyValueStore>(
        &self,
        session: &mut SessionStore<S>,
        email: &str,
        password: &str,
    ) -> ClientResult<UserProfile> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp = self
            .api
            .send(&req)
            .await?
            .filter(|r| !r.token.is_empty())
            .ok_or_else(|| ClientError::decode("login response has no token"))?;

        let token = resp.token.clone();
        let user = resp.into_user();
        session.begin(user.clone(), token);
        session.remember_email(&req.email);
        log_info!("Signed in as {} (station {:?})", user.email, user.station_id);
        Ok(user)
    }

    /// 服务端登出失败不影响本地清理
    pub async fn logout<S: KeyValueStore>(&self, session: &mut SessionStore<S>) {
        if let Err(e) = self
            .api
            .request_empty(HttpMethod::Post, "/Auth/logout", None, &[])
            .await
        {
            log_warn!("Logout request failed: {}", e);
        }
        session.clear();
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let req = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        self.api.send(&req).await.map(|_| ())
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ClientResult<()> {
        let req = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
        };
        self.api.send(&req).await.map(|_| ())
    }

    pub async fn me(&self) -> ClientResult<UserProfile> {
        self.api.get("/Auth/me", &[]).await
    }

    pub async fn profile(&self) -> ClientResult<UserProfile> {
        self.api.get("/Users/profile", &[]).await
    }

    /// 换取新 token 并写回会话
    pub async fn refresh_token<S: KeyValueStore>(
        &self,
        session: &mut SessionStore<S>,
    ) -> ClientResult<String> {
        let resp: RefreshTokenResponse = self
            .api
            .request(HttpMethod::Post, "/Auth/refresh-token", None, &[])
            .await?;
        if resp.token.is_empty() {
            return Err(ClientError::decode("refresh response has no token"));
        }
        session.update_token(resp.token.clone());
        Ok(resp.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::MockHttpClient;
    use crate::session::MemoryStore;
    use crate::{STORAGE_KEY_LAST_EMAIL, STORAGE_KEY_TOKEN};
    use serde_json::json;

    const BASE: &str = "http://localhost:3000/api";

    fn api() -> ApiClient<MockHttpClient> {
        ApiClient::new(MockHttpClient::new(), &ClientConfig::default())
    }

    #[tokio::test]
    async fn test_login_begins_session() {
        let api = api();
        mock_login(&api);

        let mut session = SessionStore::load(MemoryStore::default());
        let user = AuthService::new(&api)
            .login(&mut session, " staff@evrent.vn ", "secret")
            .await
            .unwrap();

        assert_eq!(user.full_name, "Le Hoa");
        assert_eq!(session.token(), Some("jwt-1"));
        assert_eq!(session.storage().get(STORAGE_KEY_TOKEN).as_deref(), Some("jwt-1"));
        assert_eq!(
            session.storage().get(STORAGE_KEY_LAST_EMAIL).as_deref(),
            Some("staff@evrent.vn")
        );
    }

    fn mock_login(api: &ApiClient<MockHttpClient>) {
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/Auth/login", BASE),
            200,
            json!({
                "success": true,
                "data": {"token": "jwt-1", "user": {"id": 3, "fullName": "Le Hoa", "stationId": 1}}
            }),
        );
    }

    #[tokio::test]
    async fn test_login_failure_keeps_session_empty() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/Auth/login", BASE),
            400,
            json!({"success": false, "message": "Invalid credentials"}),
        );

        let mut session = SessionStore::load(MemoryStore::default());
        let err = AuthService::new(&api)
            .login(&mut session, "x@y.vn", "bad")
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::api(400, "Invalid credentials"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_even_on_failure() {
        let api = api();
        mock_login(&api);
        let mut session = SessionStore::load(MemoryStore::default());
        let auth = AuthService::new(&api);
        auth.login(&mut session, "a@b.vn", "pw").await.unwrap();

        // 未 mock 的 logout 返回 404
        auth.logout(&mut session).await;
        assert!(!session.is_authenticated());
        assert!(session.storage().get(STORAGE_KEY_TOKEN).is_none());
    }

    #[tokio::test]
    async fn test_reset_password_body() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/Auth/reset-password", BASE),
            200,
            json!({"success": true, "message": "done", "data": null}),
        );

        AuthService::new(&api)
            .reset_password("tkn", "abcdef", "abcdef")
            .await
            .unwrap();
        assert_eq!(
            api.http().last_body(),
            Some(json!({"token": "tkn", "newPassword": "abcdef", "confirmPassword": "abcdef"}))
        );
    }

    #[tokio::test]
    async fn test_refresh_token_updates_session() {
        let api = api();
        mock_login(&api);
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/Auth/refresh-token", BASE),
            200,
            json!({"data": {"token": "jwt-2"}}),
        );

        let mut session = SessionStore::load(MemoryStore::default());
        let auth = AuthService::new(&api);
        auth.login(&mut session, "a@b.vn", "pw").await.unwrap();
        assert_eq!(auth.refresh_token(&mut session).await.unwrap(), "jwt-2");
        assert_eq!(session.token(), Some("jwt-2"));
    }

    #[tokio::test]
    async fn test_me_and_profile_paths() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/Auth/me", BASE),
            200,
            json!({"data": {"id": 3, "fullName": "Le Hoa", "role": "Staff"}}),
        );
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{}/Users/profile", BASE),
            200,
            json!({"data": {"id": 3, "fullName": "Le Thi Hoa", "phoneNumber": "0901"}}),
        );

        let auth = AuthService::new(&api);
        let me = auth.me().await.unwrap();
        assert_eq!(me.role, "Staff");
        assert_eq!(
            api.http().last_call(),
            Some(("GET".to_string(), format!("{}/Auth/me", BASE)))
        );
        assert_eq!(api.http().last_body(), None);

        let profile = auth.profile().await.unwrap();
        assert_eq!(profile.full_name, "Le Thi Hoa");
        assert_eq!(profile.phone_number.as_deref(), Some("0901"));
        assert_eq!(
            api.http().last_call(),
            Some(("GET".to_string(), format!("{}/Users/profile", BASE)))
        );
    }

    #[tokio::test]
    async fn test_forgot_password_trims_email() {
        let api = api();
        api.http().mock_response(
            HttpMethod::Post,
            &format!("{}/Auth/forgot-password", BASE),
            200,
            json!({"success": true, "message": "sent", "data": null}),
        );

        AuthService::new(&api)
            .forgot_password("  staff@evrent.vn ")
            .await
            .unwrap();
        assert_eq!(
            api.http().last_call(),
            Some(("POST".to_string(), format!("{}/Auth/forgot-password", BASE)))
        );
        assert_eq!(api.http().last_body(), Some(json!({"email": "staff@evrent.vn"})));
    }
}
