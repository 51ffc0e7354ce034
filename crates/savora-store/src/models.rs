//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the API layer as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use savora_shared::types::{Plan, PlanState};

/// Stored kind text that matches none of the known variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {column} value: {value}")]
pub struct ParseKindError {
    pub column: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A user profile, provisioned on first successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Unique profile identifier (matches the account id).
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Stored plan; admin and override promotion is applied at resolution
    /// time, never written back.
    pub plan: Plan,
    pub is_admin: bool,
    /// Set once at provisioning for free-trial profiles, never recomputed.
    pub trial_expires_at: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
    /// Dietary goal chosen during onboarding.
    pub goal: Option<String>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub start_weight: Option<f64>,
    pub dark_mode: bool,
    /// Consecutive-day engagement streak.
    pub streak: u32,
    pub last_streak_update: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// The stored plan fields in the shape the entitlement engine consumes.
    pub fn plan_state(&self) -> PlanState {
        PlanState {
            plan: self.plan,
            is_admin: self.is_admin,
            trial_expires_at: self.trial_expires_at,
        }
    }
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub goal: Option<String>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub start_weight: Option<f64>,
    pub dark_mode: Option<bool>,
    pub avatar_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// A published recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Preparation time, free-form (e.g. "25 min").
    pub time: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A published video lesson.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoLesson {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: String,
    pub duration: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category: Option<String>,
    pub video_url: String,
    /// Premium-flagged lessons are never available on the Essential plan.
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

/// Whether a favorited / viewed item is a recipe or a video lesson.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Recipe,
    Video,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Recipe => "recipe",
            ItemKind::Video => "video",
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recipe" => Ok(ItemKind::Recipe),
            "video" => Ok(ItemKind::Video),
            other => Err(ParseKindError {
                column: "kind",
                value: other.to_string(),
            }),
        }
    }
}

/// A `(user, item)` favorite pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favorite {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub kind: ItemKind,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// What a history row records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Login,
    Logout,
    Welcome,
    ViewVideo,
    ViewRecipe,
    Favorite,
    ProfileUpdate,
    UploadImage,
    UploadVideo,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::Logout => "logout",
            ActivityKind::Welcome => "welcome",
            ActivityKind::ViewVideo => "view_video",
            ActivityKind::ViewRecipe => "view_recipe",
            ActivityKind::Favorite => "favorite",
            ActivityKind::ProfileUpdate => "profile_update",
            ActivityKind::UploadImage => "upload_image",
            ActivityKind::UploadVideo => "upload_video",
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(ActivityKind::Login),
            "logout" => Ok(ActivityKind::Logout),
            "welcome" => Ok(ActivityKind::Welcome),
            "view_video" => Ok(ActivityKind::ViewVideo),
            "view_recipe" => Ok(ActivityKind::ViewRecipe),
            "favorite" => Ok(ActivityKind::Favorite),
            "profile_update" => Ok(ActivityKind::ProfileUpdate),
            "upload_image" => Ok(ActivityKind::UploadImage),
            "upload_video" => Ok(ActivityKind::UploadVideo),
            other => Err(ParseKindError {
                column: "kind",
                value: other.to_string(),
            }),
        }
    }
}

/// One immutable row of a user's activity history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: ActivityKind,
    pub title: String,
    /// The recipe/video the activity refers to, when there is one.
    pub item_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Notification category, mirrored by the client's icon set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Message,
    System,
    Video,
    Welcome,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Message => "message",
            NotificationKind::System => "system",
            NotificationKind::Video => "video",
            NotificationKind::Welcome => "welcome",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(NotificationKind::Message),
            "system" => Ok(NotificationKind::System),
            "video" => Ok(NotificationKind::Video),
            "welcome" => Ok(NotificationKind::Welcome),
            other => Err(ParseKindError {
                column: "kind",
                value: other.to_string(),
            }),
        }
    }
}

/// A notification addressed to a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub sender_id: Option<Uuid>,
    /// Client-side navigation target.
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A single support-chat message.  Each user owns one thread shared with the
/// support staff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    /// Thread owner.
    pub user_id: Uuid,
    /// Authoring profile.
    pub sender_id: Uuid,
    pub text: String,
    /// Authored by support staff rather than the thread owner.
    pub is_admin: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Summary of one support thread, for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSession {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub last_message: ChatMessage,
    /// Messages from the user not yet read by support.
    pub unread_count: u32,
    /// Premium subscribers get priority support.
    pub priority: bool,
}

// ---------------------------------------------------------------------------
// Video view event
// ---------------------------------------------------------------------------

/// Raw view event; deduplicated per calendar month for the Essential quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoView {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub viewed_at: DateTime<Utc>,
}
