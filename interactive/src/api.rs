use async_trait::async_trait;
use bugbee_core::api::paths;
use bugbee_core::config::ClientConfig;
use bugbee_core::profile::ProfileUpdate;
use bugbee_core::{ApiError, ForumApi};
use bugbee_shared::{
    Answer, AnswerBody, EntityId, Envelope, ErrorBody, NewQuestion, Notification, Question,
    QuestionPatch, SignInRequest, User, VoteRequest, VoteResult,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::{window, RequestCredentials};

fn meta_content(name: &str) -> Option<String> {
    let document = window()?.document()?;
    let el = document
        .query_selector(&format!("meta[name='{name}']"))
        .ok()
        .flatten()?;
    el.get_attribute("content").filter(|c| !c.trim().is_empty())
}

/// Build-time defaults, overridden by an optional `bugbee-config` JSON meta
/// tag and then by the individual `bugbee-api` / `bugbee-google-client-id`
/// tags the hosting page sets.
pub fn load_config() -> ClientConfig {
    let base = match meta_content("bugbee-config").map(|json| ClientConfig::from_json(&json)) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            tracing::warn!(%err, "ignoring malformed bugbee-config meta tag");
            ClientConfig::default()
        }
        None => ClientConfig::default(),
    };
    base.with_overrides(
        meta_content("bugbee-api").as_deref(),
        meta_content("bugbee-google-client-id").as_deref(),
    )
}

fn transport(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

/// [`ForumApi`] over `fetch`. Every request carries the session cookie.
#[derive(Clone, Debug)]
pub struct HttpApi {
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn builder(&self, method: fn(&str) -> RequestBuilder, path: &str) -> RequestBuilder {
        method(&self.config.url(path)).credentials(RequestCredentials::Include)
    }

    async fn execute(&self, request: Result<Request, gloo_net::Error>) -> Result<Response, ApiError> {
        let response = request.map_err(transport)?.send().await.map_err(transport)?;
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(status, url = %response.url(), ?message, "request failed");
        Err(ApiError::Status { status, message })
    }

    async fn data<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<Envelope<T>>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.builder(Request::get, path).build()).await?;
        Self::data(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: fn(&str) -> RequestBuilder,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.execute(self.builder(method, path).json(body)).await?;
        Self::data(response).await
    }

    /// For endpoints whose body the client does not read.
    async fn fire(
        &self,
        method: fn(&str) -> RequestBuilder,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), ApiError> {
        let builder = self.builder(method, path);
        let request = match body {
            Some(body) => builder.json(body),
            None => builder.build(),
        };
        self.execute(request).await.map(drop)
    }
}

fn to_value<T: Serialize>(body: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait(?Send)]
impl ForumApi for HttpApi {
    async fn session(&self) -> Result<User, ApiError> {
        self.get(paths::PROFILE).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.send_json(Request::patch, paths::PROFILE, update).await
    }

    async fn public_profile(&self, id: &EntityId) -> Result<User, ApiError> {
        self.get(&paths::profile(id)).await
    }

    async fn questions(&self) -> Result<Vec<Question>, ApiError> {
        self.get(paths::QUESTIONS).await
    }

    async fn my_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.get(paths::MY_QUESTIONS).await
    }

    async fn question(&self, id: &EntityId) -> Result<Question, ApiError> {
        self.get(&paths::question(id)).await
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<(), ApiError> {
        self.fire(Request::post, paths::QUESTIONS, Some(&to_value(question)?))
            .await
    }

    async fn update_question(&self, id: &EntityId, patch: &QuestionPatch) -> Result<(), ApiError> {
        self.fire(Request::patch, &paths::question(id), Some(&to_value(patch)?))
            .await
    }

    async fn delete_question(&self, id: &EntityId) -> Result<(), ApiError> {
        self.fire(Request::delete, &paths::question(id), None).await
    }

    async fn post_answer(&self, question_id: &EntityId, body: &AnswerBody) -> Result<Answer, ApiError> {
        self.send_json(Request::post, &paths::question_answers(question_id), body)
            .await
    }

    async fn answers(&self, question_id: &EntityId) -> Result<Vec<Answer>, ApiError> {
        self.get(&paths::question_answers(question_id)).await
    }

    async fn update_answer(&self, id: &EntityId, body: &AnswerBody) -> Result<Answer, ApiError> {
        self.send_json(Request::put, &paths::answer(id), body).await
    }

    async fn delete_answer(&self, id: &EntityId) -> Result<(), ApiError> {
        self.fire(Request::delete, &paths::answer(id), None).await
    }

    async fn vote(&self, request: &VoteRequest) -> Result<VoteResult, ApiError> {
        self.send_json(Request::post, paths::VOTE, request).await
    }

    async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get(paths::NOTIFICATIONS).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.fire(Request::post, paths::MARK_ALL_READ, None).await
    }

    async fn sign_in(&self, credential: &str) -> Result<User, ApiError> {
        let body = SignInRequest {
            token: credential.to_string(),
        };
        self.send_json(Request::post, paths::SIGN_IN, &body).await
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.fire(Request::post, paths::SIGN_OUT, None).await
    }

    async fn subscribe_newsletter(&self) -> Result<(), ApiError> {
        self.fire(Request::patch, paths::NEWSLETTER, None).await
    }
}
