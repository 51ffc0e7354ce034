use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use savora_shared::constants::{ACTIVITY_HISTORY_LIMIT, APP_NAME};
use savora_shared::types::{AccessRequest, Decision, Plan, Section};
use savora_store::{
    Activity, ActivityKind, ChatMessage, ChatSession, Database, ItemKind, Notification,
    NotificationKind, Profile, Recipe, StoreError, VideoLesson,
};

use crate::access::AccessPolicy;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::recorder::Recorder;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub policy: AccessPolicy,
    pub recorder: Recorder,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/login", post(login))
        .route("/users/{id}/logout", post(logout))
        .route("/users/{id}/profile", patch(update_profile))
        .route("/users/{id}/access", post(check_access))
        .route("/users/{id}/activities", delete(clear_history))
        .route("/users/{id}/favorites/{item_id}", post(toggle_favorite))
        .route("/users/{id}/notifications", get(list_notifications))
        .route(
            "/users/{id}/notifications/read-all",
            post(mark_all_notifications_read),
        )
        .route("/notifications/{id}/read", post(mark_notification_read))
        .route("/users/{id}/chat", get(chat_history).post(send_chat_message))
        .route("/users/{id}/chat/read", post(mark_chat_read))
        .route("/recipes", get(list_recipes))
        .route("/videos", get(list_videos))
        .route("/users/{id}/recipes/{recipe_id}/open", post(open_recipe))
        .route("/users/{id}/videos/{video_id}/open", post(open_video))
        .route("/admin/recipes", put(save_recipe))
        .route("/admin/recipes/{id}", delete(delete_recipe))
        .route("/admin/videos", put(save_video))
        .route("/admin/videos/{id}", delete(delete_video))
        .route("/admin/chats", get(admin_chat_sessions))
        .route("/admin/stats", get(admin_stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and run the HTTP API server.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "HTTP API listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ServerInfoResponse {
    name: &'static str,
    version: &'static str,
    registration_open: bool,
    trial_hours: i64,
}

#[derive(Deserialize)]
struct CreateUserRequest {
    email: String,
    name: String,
}

/// Everything the dashboard needs after sign-in.
#[derive(Serialize)]
struct UserPayload {
    id: Uuid,
    profile: Profile,
    favorites: Vec<Uuid>,
    history: Vec<Activity>,
    notifications: Vec<Notification>,
}

/// Body of `POST /users/{id}/access`.
///
/// The premium flag of a video is looked up server-side; clients only name
/// the item they want to open.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AccessQuery {
    Section { section: Section },
    OpenRecipe,
    OpenVideo { video_id: Uuid },
}

#[derive(Deserialize)]
struct ToggleFavoriteRequest {
    kind: ItemKind,
}

#[derive(Serialize)]
struct FavoritesResponse {
    favorites: Vec<Uuid>,
}

#[derive(Serialize)]
struct OpenRecipeResponse {
    decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipe: Option<Recipe>,
}

#[derive(Serialize)]
struct OpenVideoResponse {
    decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<VideoLesson>,
}

#[derive(Deserialize)]
struct SendChatRequest {
    sender_id: Uuid,
    text: String,
}

#[derive(Deserialize)]
struct MarkChatReadRequest {
    reader_id: Uuid,
}

#[derive(Deserialize)]
struct ActorQuery {
    actor: Uuid,
}

#[derive(Deserialize)]
struct RecipeDraft {
    id: Option<Uuid>,
    name: String,
    image: String,
    category: String,
    description: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    time: Option<String>,
}

#[derive(Deserialize)]
struct SaveRecipeRequest {
    actor_id: Uuid,
    recipe: RecipeDraft,
}

#[derive(Deserialize)]
struct VideoDraft {
    id: Option<Uuid>,
    title: String,
    thumbnail: String,
    duration: String,
    description: String,
    short_description: Option<String>,
    category: Option<String>,
    video_url: String,
    #[serde(default)]
    is_premium: bool,
}

#[derive(Deserialize)]
struct SaveVideoRequest {
    actor_id: Uuid,
    video: VideoDraft,
}

#[derive(Serialize)]
struct AdminStatsResponse {
    users: u32,
    recipes: u32,
    videos: u32,
    pending_support: u32,
}

// ---------------------------------------------------------------------------
// Health & info
// ---------------------------------------------------------------------------

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
        registration_open: state.config.registration_open,
        trial_hours: state.config.trial_hours,
    })
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserPayload>), ServerError> {
    if !state.config.registration_open {
        return Err(ServerError::RegistrationClosed);
    }

    let email = req.email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(ServerError::BadRequest("email must not be empty".to_string()));
    }

    let name = req.name.trim();
    let is_admin = state
        .config
        .admin_email
        .as_deref()
        .is_some_and(|a| a.eq_ignore_ascii_case(&email));

    let user_id = {
        let db = state.db.lock().await;
        if db.get_profile_by_email(&email)?.is_some() {
            return Err(ServerError::EmailTaken);
        }

        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            email,
            name: if name.is_empty() {
                "Member".to_string()
            } else {
                name.to_string()
            },
            plan: Plan::FreeTrial,
            is_admin,
            trial_expires_at: Some(now + Duration::hours(state.config.trial_hours)),
            avatar_url: None,
            goal: None,
            weight: None,
            target_weight: None,
            start_weight: None,
            dark_mode: false,
            streak: 0,
            last_streak_update: None,
            last_login: Some(now),
            created_at: now,
        };
        db.create_profile(&profile)?;
        info!(user = %profile.id, admin = is_admin, "profile provisioned");
        profile.id
    };

    state
        .recorder
        .record(user_id, ActivityKind::Welcome, "Welcome to Savora!", None)
        .await;

    let profile = state.policy.resolve_profile(user_id).await?;
    let payload = user_payload(&state, profile).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPayload>, ServerError> {
    let profile = state.policy.resolve_profile(user_id).await?;
    Ok(Json(user_payload(&state, profile).await?))
}

async fn login(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPayload>, ServerError> {
    let mut profile = state.policy.resolve_profile(user_id).await?;

    let now = Utc::now();
    {
        let db = state.db.lock().await;
        if let Err(e) = db.touch_last_login(user_id, now) {
            warn!(user = %user_id, error = %e, "failed to record login time");
        }
    }
    profile.last_login = Some(now);

    state
        .recorder
        .record(user_id, ActivityKind::Login, "Signed in", None)
        .await;

    Ok(Json(user_payload(&state, profile).await?))
}

async fn logout(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServerError> {
    // Recorded even for unknown ids; a stale session must still sign out.
    state
        .recorder
        .record(user_id, ActivityKind::Logout, "Signed out", None)
        .await;
    Ok(Json(serde_json::json!({ "loggedOut": true })))
}

async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(update): Json<savora_store::ProfileUpdate>,
) -> Result<Json<Profile>, ServerError> {
    {
        let db = state.db.lock().await;
        db.update_profile(user_id, &update).map_err(|e| match e {
            StoreError::NotFound => ServerError::ProfileNotFound(user_id),
            other => ServerError::Store(other),
        })?;
    }

    state
        .recorder
        .record(
            user_id,
            ActivityKind::ProfileUpdate,
            "Updated profile information",
            None,
        )
        .await;

    let profile = state.policy.resolve_profile(user_id).await?;
    Ok(Json(profile))
}

async fn clear_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let removed = {
        let db = state.db.lock().await;
        db.clear_activities(user_id)?
    };
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// Assemble the post-sign-in payload for a resolved profile.
async fn user_payload(state: &AppState, profile: Profile) -> Result<UserPayload, ServerError> {
    let db = state.db.lock().await;
    let favorites = db.favorite_item_ids(profile.id)?;
    let history = db.recent_activities(profile.id, ACTIVITY_HISTORY_LIMIT)?;
    let notifications = db.notifications_for_user(profile.id)?;
    Ok(UserPayload {
        id: profile.id,
        profile,
        favorites,
        history,
        notifications,
    })
}

// ---------------------------------------------------------------------------
// Entitlements
// ---------------------------------------------------------------------------

async fn check_access(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(query): Json<AccessQuery>,
) -> Result<Json<Decision>, ServerError> {
    let request = match query {
        AccessQuery::Section { section } => AccessRequest::Section { section },
        AccessQuery::OpenRecipe => AccessRequest::OpenRecipe,
        AccessQuery::OpenVideo { video_id } => {
            let db = state.db.lock().await;
            let video = db.get_video(video_id).map_err(|e| match e {
                StoreError::NotFound => ServerError::ContentNotFound(video_id),
                other => ServerError::Store(other),
            })?;
            AccessRequest::OpenVideo {
                video_id,
                is_premium: video.is_premium,
            }
        }
    };

    let decision = state.policy.check(user_id, &request).await?;
    Ok(Json(decision))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(db.list_recipes()?))
}

async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoLesson>>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(db.list_videos()?))
}

async fn open_recipe(
    State(state): State<AppState>,
    Path((user_id, recipe_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OpenRecipeResponse>, ServerError> {
    let profile = state.policy.resolve_profile(user_id).await?;
    let recipe = {
        let db = state.db.lock().await;
        db.get_recipe(recipe_id).map_err(|e| match e {
            StoreError::NotFound => ServerError::ContentNotFound(recipe_id),
            other => ServerError::Store(other),
        })?
    };

    let decision = state.policy.check_for(&profile, &AccessRequest::OpenRecipe).await;
    if !decision.allowed {
        debug!(user = %user_id, recipe = %recipe_id, reason = ?decision.reason, "recipe open denied");
        return Ok(Json(OpenRecipeResponse {
            decision,
            recipe: None,
        }));
    }

    state
        .recorder
        .record_content_view(
            &profile,
            ActivityKind::ViewRecipe,
            format!("Viewed: {}", recipe.name),
            recipe.id,
        )
        .await;

    Ok(Json(OpenRecipeResponse {
        decision,
        recipe: Some(recipe),
    }))
}

async fn open_video(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OpenVideoResponse>, ServerError> {
    let profile = state.policy.resolve_profile(user_id).await?;
    let video = {
        let db = state.db.lock().await;
        db.get_video(video_id).map_err(|e| match e {
            StoreError::NotFound => ServerError::ContentNotFound(video_id),
            other => ServerError::Store(other),
        })?
    };

    let request = AccessRequest::OpenVideo {
        video_id,
        is_premium: video.is_premium,
    };
    let decision = state.policy.check_for(&profile, &request).await;
    if !decision.allowed {
        debug!(user = %user_id, video = %video_id, reason = ?decision.reason, "video open denied");
        return Ok(Json(OpenVideoResponse {
            decision,
            video: None,
        }));
    }

    // The view event feeds the monthly quota; the open itself must not fail
    // on a lost write.
    {
        let view = savora_store::VideoView {
            user_id,
            video_id: video.id,
            viewed_at: Utc::now(),
        };
        let db = state.db.lock().await;
        if let Err(e) = db.record_video_view(&view) {
            warn!(user = %user_id, video = %video_id, error = %e, "failed to record video view");
        }
    }

    state
        .recorder
        .record_content_view(
            &profile,
            ActivityKind::ViewVideo,
            format!("Viewed: {}", video.title),
            video.id,
        )
        .await;

    Ok(Json(OpenVideoResponse {
        decision,
        video: Some(video),
    }))
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

async fn toggle_favorite(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ToggleFavoriteRequest>,
) -> Result<Json<FavoritesResponse>, ServerError> {
    // Resolving first keeps unknown ids a 404 instead of a foreign-key error.
    state.policy.resolve_profile(user_id).await?;

    let toggle = {
        let db = state.db.lock().await;
        db.toggle_favorite(user_id, item_id, req.kind, Utc::now())?
    };

    if toggle.added {
        let title = match req.kind {
            ItemKind::Recipe => "Added a recipe to favorites",
            ItemKind::Video => "Added a video to favorites",
        };
        state
            .recorder
            .record(user_id, ActivityKind::Favorite, title, Some(item_id))
            .await;
    }

    Ok(Json(FavoritesResponse {
        favorites: toggle.favorites,
    }))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(db.notifications_for_user(user_id)?))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let updated = {
        let db = state.db.lock().await;
        db.mark_notification_read(notification_id)?
    };
    Ok(Json(serde_json::json!({ "updated": updated })))
}

async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let updated = {
        let db = state.db.lock().await;
        db.mark_notifications_read(user_id, None)?
    };
    Ok(Json(serde_json::json!({ "updated": updated })))
}

// ---------------------------------------------------------------------------
// Support chat
// ---------------------------------------------------------------------------

async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(db.chat_messages_for_user(user_id)?))
}

async fn send_chat_message(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SendChatRequest>,
) -> Result<Json<ChatMessage>, ServerError> {
    let sender = state.policy.resolve_profile(req.sender_id).await?;
    if !sender.is_admin && sender.id != user_id {
        return Err(ServerError::Forbidden(
            "only support staff may write to another member's thread".to_string(),
        ));
    }

    let message = ChatMessage {
        id: Uuid::new_v4(),
        user_id,
        sender_id: sender.id,
        text: req.text,
        is_admin: sender.is_admin,
        is_read: false,
        created_at: Utc::now(),
    };
    {
        let db = state.db.lock().await;
        db.insert_chat_message(&message)?;
    }

    // Notify the counterpart: staff replies ping the member, member messages
    // ping the configured support profile.
    if sender.is_admin {
        state
            .recorder
            .notify_direct(
                user_id,
                NotificationKind::Message,
                "New message from support",
                &message.text,
                Some(sender.id),
                Some("/chat".to_string()),
            )
            .await;
    } else if let Some(admin_id) = support_profile_id(&state).await {
        state
            .recorder
            .notify_direct(
                admin_id,
                NotificationKind::Message,
                "New message from a member",
                &message.text,
                Some(sender.id),
                Some("/admin/support".to_string()),
            )
            .await;
    } else {
        debug!("no support profile configured; skipping message notification");
    }

    Ok(Json(message))
}

async fn mark_chat_read(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<MarkChatReadRequest>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let reader = state.policy.resolve_profile(req.reader_id).await?;

    let updated = {
        let db = state.db.lock().await;
        // The reader marks the counterpart's messages as read.
        let updated = db.mark_chat_read(user_id, !reader.is_admin)?;
        db.mark_notifications_read(reader.id, Some(NotificationKind::Message))?;
        updated
    };

    Ok(Json(serde_json::json!({ "updated": updated })))
}

/// The configured support-staff profile, if it exists.
async fn support_profile_id(state: &AppState) -> Option<Uuid> {
    let email = state.config.admin_email.as_deref()?;
    let db = state.db.lock().await;
    match db.get_profile_by_email(email) {
        Ok(profile) => profile.map(|p| p.id),
        Err(e) => {
            warn!(error = %e, "failed to look up support profile");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

async fn require_admin(state: &AppState, actor: Uuid) -> Result<Profile, ServerError> {
    let profile = state.policy.resolve_profile(actor).await?;
    if !profile.is_admin {
        return Err(ServerError::Forbidden(
            "administrator access required".to_string(),
        ));
    }
    Ok(profile)
}

async fn save_recipe(
    State(state): State<AppState>,
    Json(req): Json<SaveRecipeRequest>,
) -> Result<Json<Recipe>, ServerError> {
    require_admin(&state, req.actor_id).await?;
    let draft = req.recipe;

    if let Some(id) = draft.id {
        let recipe = {
            let db = state.db.lock().await;
            let mut recipe = db.get_recipe(id).map_err(|e| match e {
                StoreError::NotFound => ServerError::ContentNotFound(id),
                other => ServerError::Store(other),
            })?;
            recipe.name = draft.name;
            recipe.image = draft.image;
            recipe.category = draft.category;
            recipe.description = draft.description;
            recipe.ingredients = draft.ingredients;
            recipe.instructions = draft.instructions;
            recipe.time = draft.time;
            db.update_recipe(&recipe)?;
            recipe
        };
        return Ok(Json(recipe));
    }

    let recipe = Recipe {
        id: Uuid::new_v4(),
        name: draft.name,
        image: draft.image,
        category: draft.category,
        description: draft.description,
        ingredients: draft.ingredients,
        instructions: draft.instructions,
        time: draft.time,
        created_at: Utc::now(),
    };
    {
        let db = state.db.lock().await;
        db.insert_recipe(&recipe)?;
    }
    info!(recipe = %recipe.id, name = %recipe.name, "recipe published");

    state
        .recorder
        .broadcast(
            NotificationKind::System,
            &format!("New recipe: {}", recipe.name),
            &format!("Check out our new {} recipe!", recipe.category),
            &format!("recipes?id={}", recipe.id),
        )
        .await;

    Ok(Json(recipe))
}

async fn delete_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<serde_json::Value>, ServerError> {
    require_admin(&state, query.actor).await?;
    let deleted = {
        let db = state.db.lock().await;
        db.delete_recipe(recipe_id)?
    };
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

async fn save_video(
    State(state): State<AppState>,
    Json(req): Json<SaveVideoRequest>,
) -> Result<Json<VideoLesson>, ServerError> {
    let actor = require_admin(&state, req.actor_id).await?;
    let draft = req.video;

    if let Some(id) = draft.id {
        let video = {
            let db = state.db.lock().await;
            let mut video = db.get_video(id).map_err(|e| match e {
                StoreError::NotFound => ServerError::ContentNotFound(id),
                other => ServerError::Store(other),
            })?;
            video.title = draft.title;
            video.thumbnail = draft.thumbnail;
            video.duration = draft.duration;
            video.description = draft.description;
            video.short_description = draft.short_description;
            video.category = draft.category;
            video.video_url = draft.video_url;
            video.is_premium = draft.is_premium;
            db.update_video(&video)?;
            video
        };
        return Ok(Json(video));
    }

    let video = VideoLesson {
        id: Uuid::new_v4(),
        title: draft.title,
        thumbnail: draft.thumbnail,
        duration: draft.duration,
        description: draft.description,
        short_description: draft.short_description,
        category: draft.category,
        video_url: draft.video_url,
        is_premium: draft.is_premium,
        created_at: Utc::now(),
    };
    {
        let db = state.db.lock().await;
        db.insert_video(&video)?;
    }
    info!(video = %video.id, title = %video.title, premium = video.is_premium, "video published");

    state
        .recorder
        .record(
            actor.id,
            ActivityKind::UploadVideo,
            format!("Published: {}", video.title),
            Some(video.id),
        )
        .await;

    let category = video.category.as_deref().unwrap_or("lessons");
    state
        .recorder
        .broadcast(
            NotificationKind::Video,
            &format!("New lesson: {}", video.title),
            &format!("Check out the new {category} video!"),
            &format!("videos?id={}", video.id),
        )
        .await;

    Ok(Json(video))
}

async fn delete_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<serde_json::Value>, ServerError> {
    require_admin(&state, query.actor).await?;
    let deleted = {
        let db = state.db.lock().await;
        db.delete_video(video_id)?
    };
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

async fn admin_chat_sessions(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Vec<ChatSession>>, ServerError> {
    require_admin(&state, query.actor).await?;
    let db = state.db.lock().await;
    Ok(Json(db.chat_sessions()?))
}

async fn admin_stats(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AdminStatsResponse>, ServerError> {
    require_admin(&state, query.actor).await?;
    let db = state.db.lock().await;
    Ok(Json(AdminStatsResponse {
        users: db.count_profiles()?,
        recipes: db.count_recipes()?,
        videos: db.count_videos()?,
        pending_support: db.pending_support_count()?,
    }))
}
