//! Diesel schema for board persistence.

diesel::table! {
    /// Board columns.
    stage (id) {
        /// Stage identifier.
        id -> BigInt,
        /// Unique stage name.
        name -> Text,
    }
}

diesel::table! {
    /// Cards, each owned by one stage.
    task (id) {
        /// Task identifier.
        id -> BigInt,
        /// Task name.
        name -> Text,
        /// Owning stage.
        stage_id -> BigInt,
        /// Zero-based rank within the owning stage.
        position -> Integer,
    }
}

diesel::joinable!(task -> stage (stage_id));
diesel::allow_tables_to_appear_in_same_query!(stage, task);
