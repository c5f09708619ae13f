// Database schema for the user API
diesel::table! {
    users (id) {
        id -> Text,    // UUID, assigned by the caller
        name -> Text,  // Display name
        email -> Text, // Contact address
    }
}
