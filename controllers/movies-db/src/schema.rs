diesel::table! {
    movies (id) {
        id -> Int4,
        user_id -> Int4,
        title -> Varchar,
        genre -> Varchar,
        rating -> Int4,
        year -> Varchar,
        runtime -> Varchar,
        avr_rating -> Float8,
    }
}

pub const CREATE_MOVIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL,
    title VARCHAR NOT NULL,
    genre VARCHAR NOT NULL,
    rating INTEGER NOT NULL,
    year VARCHAR NOT NULL,
    runtime VARCHAR NOT NULL,
    avr_rating DOUBLE PRECISION NOT NULL DEFAULT 0
)
"#;

pub const CREATE_MOVIES_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS ix_movies_user_id ON movies (user_id)",
    "CREATE INDEX IF NOT EXISTS ix_movies_title ON movies (title)",
];
