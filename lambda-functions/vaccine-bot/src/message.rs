use tracing::info;

const PREFIX: &str = "💉 Get vaccinated against";

/// Formats the post text for a disease.
pub fn build(disease: &str) -> String {
    info!("Generating new tweet with disease: {}", disease);
    format!("{PREFIX} {disease}")
}
