diesel::table! {
    authorization_record (id) {
        id -> Uuid,
        authorization_type -> Int4,
        resource_type -> Int4,
        resource_id -> Text,
        permissions -> Int4,
        user_id -> Nullable<Text>,
        group_id -> Nullable<Text>,
    }
}
