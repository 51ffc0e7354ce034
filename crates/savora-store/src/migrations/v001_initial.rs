//! v001 -- Initial schema creation.
//!
//! Creates the eight core tables: `profiles`, `recipes`, `video_lessons`,
//! `favorites`, `user_activities`, `notifications`, `chat_messages`, and
//! `video_views`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Profiles
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS profiles (
    id                 TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    email              TEXT NOT NULL UNIQUE,
    name               TEXT NOT NULL,
    plan               TEXT NOT NULL DEFAULT 'free_trial',
    is_admin           INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1
    trial_expires_at   TEXT,                        -- ISO-8601 / RFC-3339
    avatar_url         TEXT,
    goal               TEXT,
    weight             REAL,
    target_weight      REAL,
    start_weight       REAL,
    dark_mode          INTEGER NOT NULL DEFAULT 0,
    streak             INTEGER NOT NULL DEFAULT 0,
    last_streak_update TEXT,
    last_login         TEXT,
    created_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_profiles_email ON profiles(email);

-- ----------------------------------------------------------------
-- Recipes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS recipes (
    id           TEXT PRIMARY KEY NOT NULL,         -- UUID v4
    name         TEXT NOT NULL,
    image        TEXT NOT NULL,
    category     TEXT NOT NULL,
    description  TEXT NOT NULL,
    ingredients  TEXT NOT NULL,                     -- JSON array of strings
    instructions TEXT NOT NULL,                     -- JSON array of strings
    time         TEXT,
    created_at   TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Video lessons
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS video_lessons (
    id                TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    title             TEXT NOT NULL,
    thumbnail         TEXT NOT NULL,
    duration          TEXT NOT NULL,
    description       TEXT NOT NULL,
    short_description TEXT,
    category          TEXT,
    video_url         TEXT NOT NULL,
    is_premium        INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Favorites
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS favorites (
    user_id    TEXT NOT NULL,                       -- FK -> profiles(id)
    item_id    TEXT NOT NULL,                       -- recipe or video UUID
    kind       TEXT NOT NULL,                       -- 'recipe' | 'video'
    created_at TEXT NOT NULL,

    PRIMARY KEY (user_id, item_id),
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- User activities (append-only history)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS user_activities (
    id         TEXT PRIMARY KEY NOT NULL,           -- UUID v4
    user_id    TEXT NOT NULL,                       -- FK -> profiles(id)
    kind       TEXT NOT NULL,
    title      TEXT NOT NULL,
    item_id    TEXT,                                -- related content, nullable
    created_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_activities_user_ts
    ON user_activities(user_id, created_at DESC);

-- ----------------------------------------------------------------
-- Notifications
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS notifications (
    id         TEXT PRIMARY KEY NOT NULL,           -- UUID v4
    user_id    TEXT NOT NULL,                       -- recipient, FK -> profiles(id)
    kind       TEXT NOT NULL,
    title      TEXT NOT NULL,
    content    TEXT NOT NULL,
    sender_id  TEXT,                                -- nullable profile UUID
    link       TEXT,
    is_read    INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_notifications_user_ts
    ON notifications(user_id, created_at DESC);

-- ----------------------------------------------------------------
-- Chat messages (one support thread per user)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS chat_messages (
    id         TEXT PRIMARY KEY NOT NULL,           -- UUID v4
    user_id    TEXT NOT NULL,                       -- thread owner, FK -> profiles(id)
    sender_id  TEXT NOT NULL,                       -- authoring profile UUID
    text       TEXT NOT NULL,
    is_admin   INTEGER NOT NULL DEFAULT 0,          -- authored by support staff
    is_read    INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_chat_user_ts
    ON chat_messages(user_id, created_at);

-- ----------------------------------------------------------------
-- Video view events (append-only, feeds the monthly quota)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS video_views (
    user_id   TEXT NOT NULL,                        -- FK -> profiles(id)
    video_id  TEXT NOT NULL,
    viewed_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_video_views_user_ts
    ON video_views(user_id, viewed_at);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
