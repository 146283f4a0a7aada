//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Users provisioned from verified identities.
    users (id) {
        id -> Int4,
        /// Provider-issued username, unique.
        username -> Varchar,
        profile -> Nullable<Varchar>,
        registered_at -> Timestamptz,
    }
}

diesel::table! {
    posts (id) {
        id -> Int4,
        content -> Varchar,
        /// Always `post` today.
        post_type -> Varchar,
        posted_at -> Timestamptz,
        user_id -> Int4,
    }
}

diesel::table! {
    /// Like associations; the composite key forbids duplicates.
    post_likes (post_id, user_id) {
        post_id -> Int4,
        user_id -> Int4,
    }
}

diesel::joinable!(posts -> users (user_id));
diesel::joinable!(post_likes -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, posts, post_likes);
