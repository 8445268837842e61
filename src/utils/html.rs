use std::collections::HashSet;

use ammonia::Builder;

const MAX_DISPLAY_NAME_CHARS: usize = 50;

/// Clean a display name before it is stored or echoed back.
///
/// Clients render names as markup, so the tag whitelist is emptied: every tag is
/// stripped while its text is kept, except <script>/<style> which ammonia drops
/// together with their content. The length cap applies to the raw input, so an
/// escaped entity is never cut in half.
pub fn clean_display_name(input: &str) -> String {
    let capped: String = input.trim().chars().take(MAX_DISPLAY_NAME_CHARS).collect();

    let mut builder = Builder::default();
    builder.tags(HashSet::new());
    builder.clean(&capped).to_string().trim().to_string()
}
