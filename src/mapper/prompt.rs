use crate::taxonomy::Taxonomy;

/// Build the mapping prompt: rules, full taxonomy, retrieved context, tags
/// and story, followed by the required JSON shape.
pub fn build_prompt(taxonomy: &Taxonomy, context: &[String], tags: &[String], story: &str) -> String {
    let taxonomy_block = taxonomy
        .entries()
        .iter()
        .map(|e| format!("{}: {}", e.genre, e.subgenres.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    let context_block = if context.is_empty() {
        "(none)".to_string()
    } else {
        context.join("\n")
    };

    let tags_block = if tags.is_empty() {
        "(none)".to_string()
    } else {
        tags.join(", ")
    };

    format!(
        "You are an inference engine that maps stories to an internal taxonomy.\n\n\
         Rules:\n\
         1. Story context overrides user tags.\n\
         2. Choose only from the provided taxonomy.\n\
         3. If no category fits, return UNMAPPED for both genre and subgenre.\n\
         4. Do not invent new categories.\n\n\
         Taxonomy:\n{taxonomy_block}\n\n\
         Retrieved Taxonomy Context:\n{context_block}\n\n\
         User Tags:\n{tags_block}\n\n\
         Story:\n{story}\n\n\
         Return output strictly as JSON with exactly these fields and nothing else:\n\
         {{\"genre\": \"\", \"subgenre\": \"\", \"reasoning\": \"\"}}"
    )
}
