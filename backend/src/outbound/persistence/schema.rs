//! Diesel table definitions, kept in sync with `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Uuid,
        first_name -> Text,
        last_name -> Nullable<Text>,
        email -> Text,
        role -> Text,
        password_hash -> Text,
        reset_password_token_hash -> Nullable<Text>,
        reset_password_expires_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    bootcamps (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        description -> Text,
        website -> Nullable<Text>,
        phone -> Nullable<Text>,
        email -> Nullable<Text>,
        latitude -> Float8,
        longitude -> Float8,
        formatted_address -> Nullable<Text>,
        street -> Nullable<Text>,
        city -> Nullable<Text>,
        state -> Nullable<Text>,
        zipcode -> Nullable<Text>,
        country -> Nullable<Text>,
        careers -> Array<Text>,
        average_rating -> Nullable<Float8>,
        average_cost -> Nullable<Float8>,
        photo -> Text,
        housing -> Bool,
        job_assistance -> Bool,
        job_guarantee -> Bool,
        accept_gi -> Bool,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    courses (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        weeks -> Int4,
        tuition -> Float8,
        minimum_skill -> Text,
        scholarship_available -> Bool,
        bootcamp_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reviews (id) {
        id -> Uuid,
        title -> Text,
        body -> Text,
        rating -> Int4,
        bootcamp_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(bootcamps -> users (user_id));
diesel::joinable!(courses -> bootcamps (bootcamp_id));
diesel::joinable!(reviews -> bootcamps (bootcamp_id));

diesel::allow_tables_to_appear_in_same_query!(users, bootcamps, courses, reviews);
