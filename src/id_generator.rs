use uuid::Uuid;

/// Generate a unique object id with the given prefix, e.g. `text_3f2a...`
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
