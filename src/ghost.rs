//! Publishing to the Ghost admin API.
//!
//! The publish exchange is a small state machine: draft-pending →
//! draft-created → published. Draft creation failure is fatal to the run;
//! a failed publish transition is reported and the draft is left on the
//! target, which is a recoverable outcome. The transition resubmits the
//! post with the `updated_at` revision marker captured from the creation
//! response, verbatim — Ghost uses it for optimistic concurrency and must
//! reject a stale marker rather than silently overwrite.
//!
//! # Authentication
//!
//! Every request carries a short-lived admin JWT: header `{alg: HS256,
//! typ: JWT, kid: <key id>}`, claims `{iat, exp: iat + 300, aud:
//! "/admin/"}`, signed with the hex-decoded secret half of the admin key.
//! One token is minted per run and reused; the five-minute window covers
//! the whole exchange.

use crate::config::{AdminApiKey, Config};
use crate::utils::truncate_for_log;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::Sha256;
use thiserror::Error;
use tracing::{info, warn};

/// Admin token validity window.
pub const TOKEN_TTL_SECS: i64 = 300;
/// Audience claim for the admin API.
pub const ADMIN_AUDIENCE: &str = "/admin/";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("transport error talking to the admin API: {0}")]
    Transport(String),
    #[error("newsletter lookup returned HTTP {status}: {body}")]
    Newsletters { status: u16, body: String },
    #[error("draft creation rejected with HTTP {status}: {body}")]
    Draft { status: u16, body: String },
    #[error("publish transition rejected with HTTP {status}: {body}")]
    Transition { status: u16, body: String },
    #[error("admin API response missing {0}")]
    Shape(&'static str),
}

/// A created draft: the post id plus the revision marker the publish
/// transition must carry forward.
#[derive(Debug, Clone)]
pub struct DraftPost {
    pub id: String,
    pub updated_at: String,
}

/// Email dispatch details reported by the target on publish.
#[derive(Debug, Deserialize)]
pub struct EmailDispatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email_count: Option<u64>,
}

/// The terminal state of one publish exchange.
pub enum PublishOutcome {
    Published {
        url: Option<String>,
        email: Option<EmailDispatch>,
    },
    /// The draft exists on the target but the transition failed.
    DraftOnly { post_id: String, reason: String },
}

#[derive(Deserialize)]
struct PostsEnvelope {
    posts: Vec<PostResource>,
}

#[derive(Deserialize)]
struct PostResource {
    id: String,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    email: Option<EmailDispatch>,
}

#[derive(Deserialize)]
struct NewslettersEnvelope {
    newsletters: Vec<NewsletterResource>,
}

#[derive(Deserialize)]
struct NewsletterResource {
    id: String,
    status: String,
}

fn b64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Mint a signed admin JWT bound to `issued_at`.
pub fn admin_token(key: &AdminApiKey, issued_at: i64) -> String {
    let header = json!({ "alg": "HS256", "typ": "JWT", "kid": key.id }).to_string();
    let claims = json!({
        "iat": issued_at,
        "exp": issued_at + TOKEN_TTL_SECS,
        "aud": ADMIN_AUDIENCE,
    })
    .to_string();
    let signing_input = format!("{}.{}", b64url(header.as_bytes()), b64url(claims.as_bytes()));
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&key.secret).expect("HMAC can take key of any size");
    mac.update(signing_input.as_bytes());
    format!("{}.{}", signing_input, b64url(&mac.finalize().into_bytes()))
}

fn draft_body(title: &str, html: &str, author_id: Option<&str>) -> Value {
    let mut post = json!({ "title": title, "html": html, "status": "draft" });
    if let Some(author) = author_id {
        post["authors"] = json!([{ "id": author }]);
    }
    json!({ "posts": [post] })
}

/// The transition payload. `updated_at` is the captured marker, never a
/// freshly computed timestamp.
fn publish_body(draft: &DraftPost) -> Value {
    json!({
        "posts": [{
            "status": "published",
            "updated_at": draft.updated_at,
        }]
    })
}

pub struct GhostClient<'a> {
    http: &'a reqwest::Client,
    config: &'a Config,
}

impl<'a> GhostClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a Config) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/ghost/api/admin/{}", self.config.ghost_url, path)
    }

    /// Run the full draft → publish exchange.
    pub async fn publish(&self, title: &str, html: &str) -> Result<PublishOutcome, PublishError> {
        let token = admin_token(&self.config.admin_key, Utc::now().timestamp());

        let newsletter = self.resolve_newsletter(&token).await;
        let draft = self.create_draft(&token, title, html).await?;
        info!(post_id = %draft.id, "draft created");

        match self
            .publish_draft(&token, &draft, newsletter.as_deref())
            .await
        {
            Ok((url, email)) => Ok(PublishOutcome::Published { url, email }),
            Err(e) => {
                warn!(error = %e, post_id = %draft.id, "publish transition failed; draft retained");
                Ok(PublishOutcome::DraftOnly {
                    post_id: draft.id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Best-effort newsletter resolution: first active one, else the
    /// configured fallback. Never fatal.
    async fn resolve_newsletter(&self, token: &str) -> Option<String> {
        match self.fetch_newsletters(token).await {
            Ok(newsletters) => {
                let active = newsletters.into_iter().find(|n| n.status == "active");
                match active {
                    Some(n) => {
                        info!(newsletter_id = %n.id, "resolved active newsletter");
                        Some(n.id)
                    }
                    None => {
                        warn!("no active newsletter on target; using configured fallback");
                        self.config.newsletter_id.clone()
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "newsletter lookup failed; using configured fallback");
                self.config.newsletter_id.clone()
            }
        }
    }

    async fn fetch_newsletters(&self, token: &str) -> Result<Vec<NewsletterResource>, PublishError> {
        let response = self
            .http
            .get(self.endpoint("newsletters/"))
            .header("Authorization", format!("Ghost {token}"))
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Newsletters {
                status: status.as_u16(),
                body: truncate_for_log(&response.text().await.unwrap_or_default(), 300),
            });
        }
        let envelope: NewslettersEnvelope = response
            .json()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        Ok(envelope.newsletters)
    }

    async fn create_draft(
        &self,
        token: &str,
        title: &str,
        html: &str,
    ) -> Result<DraftPost, PublishError> {
        let response = self
            .http
            .post(self.endpoint("posts/"))
            .query(&[("source", "html")])
            .header("Authorization", format!("Ghost {token}"))
            .json(&draft_body(title, html, self.config.author_id.as_deref()))
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Draft {
                status: status.as_u16(),
                body: truncate_for_log(&response.text().await.unwrap_or_default(), 300),
            });
        }
        let envelope: PostsEnvelope = response
            .json()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        let post = envelope
            .posts
            .into_iter()
            .next()
            .ok_or(PublishError::Shape("created post"))?;
        let updated_at = post.updated_at.ok_or(PublishError::Shape("updated_at"))?;
        Ok(DraftPost {
            id: post.id,
            updated_at,
        })
    }

    async fn publish_draft(
        &self,
        token: &str,
        draft: &DraftPost,
        newsletter_id: Option<&str>,
    ) -> Result<(Option<String>, Option<EmailDispatch>), PublishError> {
        let mut request = self
            .http
            .put(self.endpoint(&format!("posts/{}/", draft.id)))
            .header("Authorization", format!("Ghost {token}"))
            .json(&publish_body(draft));
        if let Some(newsletter) = newsletter_id {
            request = request.query(&[("newsletter", newsletter)]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // A stale updated_at lands here: the target refuses the
            // transition and the draft stays as it was.
            return Err(PublishError::Transition {
                status: status.as_u16(),
                body: truncate_for_log(&response.text().await.unwrap_or_default(), 300),
            });
        }
        let envelope: PostsEnvelope = response
            .json()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        let post = envelope
            .posts
            .into_iter()
            .next()
            .ok_or(PublishError::Shape("published post"))?;
        Ok((post.url, post.email))
    }
}
