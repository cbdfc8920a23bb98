//! Naming rules: display names for operations, type-name stems, function
//! names and service names. Every rule here is a pure function.

use std::sync::LazyLock;

use heck::ToLowerCamelCase;
use regex::Regex;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"));

static WORD_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(?:\s+[A-Za-z0-9_]+)*$").expect("valid regex")
});

/// Terminal path segments that read as an action on the preceding resource.
const ACTION_VERBS: &[&str] = &[
    "add", "cancel", "create", "del", "delete", "detail", "download", "edit", "export", "fetch",
    "find", "get", "import", "info", "list", "modify", "page", "query", "remove", "save", "search",
    "start", "stop", "submit", "update", "upload",
];

/// How an operation's `summary` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// A single identifier, e.g. `listFooBars`.
    Identifier,
    /// Plain words, e.g. `Delete Bar`.
    Phrase,
    /// Anything else: punctuation, non-ASCII text, a full sentence.
    Sentence,
    Missing,
}

pub fn classify_summary(summary: Option<&str>) -> SummaryKind {
    match summary.map(str::trim) {
        None | Some("") => SummaryKind::Missing,
        Some(s) if IDENTIFIER.is_match(s) => SummaryKind::Identifier,
        Some(s) if WORD_PHRASE.is_match(s) => SummaryKind::Phrase,
        Some(_) => SummaryKind::Sentence,
    }
}

/// True if `s` is a valid TypeScript identifier (ASCII subset).
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// The operation metadata names are derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSource<'a> {
    pub summary: Option<&'a str>,
    pub description: Option<&'a str>,
    pub operation_id: Option<&'a str>,
    pub method: &'a str,
    pub path: &'a str,
}

/// A derived display name and the human text that documents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName {
    pub name: String,
    pub description: String,
}

/// Derive the display name of an operation.
///
/// Rules, first match wins:
/// 1. an identifier summary is the name;
/// 2. an `operationId` is the name (camel-cased if it is not an
///    identifier), unless neither form is an ASCII identifier;
/// 3. a plain-word summary is the name;
/// 4. the path is the name (see [`path_to_name`]).
///
/// The description is a sentence-like summary if there is one, else the
/// `description` field, else the summary, else the name.
pub fn derive_display_name(source: NameSource<'_>) -> DisplayName {
    let summary = source.summary.map(str::trim).filter(|s| !s.is_empty());
    let description = source
        .description
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let operation_id = source
        .operation_id
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let kind = classify_summary(summary);
    if let (SummaryKind::Identifier, Some(summary)) = (kind, summary) {
        return DisplayName {
            name: summary.to_string(),
            description: description.unwrap_or(summary).to_string(),
        };
    }

    let name = match (operation_id.and_then(operation_id_name), kind, summary) {
        (Some(id), _, _) => id,
        (_, SummaryKind::Phrase, Some(summary)) => summary.to_string(),
        _ => path_to_name(source.method, source.path),
    };

    let description = match kind {
        SummaryKind::Sentence => summary,
        _ => description.or(summary),
    };
    let description = description.unwrap_or(&name).to_string();
    DisplayName { name, description }
}

/// An `operationId` usable as a display name: an identifier as is, else its
/// lower-camel form when that is an identifier.
fn operation_id_name(id: &str) -> Option<String> {
    if is_identifier(id) {
        return Some(id.to_string());
    }
    let camel = id.to_lower_camel_case();
    is_identifier(&camel).then_some(camel)
}

/// Lower-camel function name for a display name: `Delete Bar` → `deleteBar`.
pub fn function_name(display_name: &str) -> String {
    let compact = compact(display_name);
    lower_first(&compact)
}

/// Type-name stem for a display name: `Delete Bar` → `DeleteBar`,
/// `listFooBars` → `ListFooBars`.
pub fn type_stem(display_name: &str) -> String {
    upper_first(&compact(display_name))
}

fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect()
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name an operation from its route (see [`path_to_camel_case`]), keeping
/// only identifier characters. A route that leaves nothing usable, or starts
/// with a digit, is prefixed with the lowercase HTTP method.
///
/// - `/api/lightModel/create` → `createLightModel`
/// - `/users/{id}` → `users`
/// - `/` → `get`
pub fn path_to_name(method: &str, path: &str) -> String {
    let name: String = path_to_camel_case(path)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();

    if is_identifier(&name) {
        name
    } else {
        format!("{}{}", method.to_ascii_lowercase(), upper_first(&name))
    }
}

/// Camel-case a path, moving a terminal action verb to the front.
///
/// - `/lightModel/create` → `createLightModel`
/// - `/light-model/create` → `createLightModel`
/// - `lightModel` → `lightModel`
pub fn path_to_camel_case(path: &str) -> String {
    let mut words: Vec<&str> = strip_api_segment(path)
        .split('/')
        .filter(|s| !s.is_empty() && !is_placeholder(s))
        .flat_map(|s| s.split(['-', '_']))
        .filter(|s| !s.is_empty())
        .collect();

    if words.len() > 1
        && let Some(last) = words.last()
        && ACTION_VERBS.contains(&last.to_ascii_lowercase().as_str())
    {
        words.rotate_right(1);
    }

    words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { lower_first(w) } else { upper_first(w) })
        .collect()
}

/// Turn a trailing verb into a noun for a service name.
///
/// Rules, first match wins: drop a trailing `s`; drop a trailing `ed`;
/// drop a trailing `ing`; rewrite a trailing `te` as `tion`.
pub fn verb_to_noun(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else if let Some(stem) = word.strip_suffix("ed") {
        stem.to_string()
    } else if let Some(stem) = word.strip_suffix("ing") {
        stem.to_string()
    } else if let Some(stem) = word.strip_suffix("te") {
        format!("{stem}tion")
    } else {
        word.to_string()
    }
}

/// Service name (without the `Service` suffix) from the last literal
/// segment of a path.
///
/// - `foo/evaluate` → `evaluation`
/// - `/api/foo/v1/bar/{bar_id}/baz/{baz_id}` → `baz`
pub fn to_service_name(path: &str) -> String {
    path.split('/')
        .rfind(|s| !s.is_empty() && !is_placeholder(s))
        .map(|seg| verb_to_noun(seg).to_lower_camel_case())
        .unwrap_or_default()
}

/// Longest common literal prefix of `paths`, compared character by
/// character, with any trailing `/` removed.
pub fn common_path_prefix<S: AsRef<str>>(paths: &[S]) -> String {
    let Some((first, rest)) = paths.split_first() else {
        return String::new();
    };
    let first = first.as_ref();
    let mut end = first.len();
    for other in rest {
        let common: usize = first
            .char_indices()
            .zip(other.as_ref().chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((_, a), _)| a.len_utf8())
            .sum();
        end = end.min(common);
    }
    first[..end].trim_end_matches('/').to_string()
}

/// Cut a prefix before its first `{placeholder}` segment, so it can be
/// interpolated into paths without carrying literal braces.
pub fn static_prefix(prefix: &str) -> &str {
    match prefix.find('{') {
        Some(idx) => prefix[..idx].trim_end_matches('/'),
        None => prefix,
    }
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

fn strip_api_segment(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/');
    match trimmed.split_once('/') {
        Some((head, rest)) if head.eq_ignore_ascii_case("api") => rest,
        None if trimmed.eq_ignore_ascii_case("api") => "",
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source<'a>(
        summary: Option<&'a str>,
        operation_id: Option<&'a str>,
        method: &'a str,
        path: &'a str,
    ) -> NameSource<'a> {
        NameSource {
            summary,
            description: None,
            operation_id,
            method,
            path,
        }
    }

    #[test]
    fn test_classify_summary() {
        assert_eq!(classify_summary(Some("listFooBars")), SummaryKind::Identifier);
        assert_eq!(classify_summary(Some("Delete Bar")), SummaryKind::Phrase);
        assert_eq!(
            classify_summary(Some("Update an existing pet.")),
            SummaryKind::Sentence
        );
        assert_eq!(classify_summary(Some("创建小模型")), SummaryKind::Sentence);
        assert_eq!(classify_summary(Some("  ")), SummaryKind::Missing);
        assert_eq!(classify_summary(None), SummaryKind::Missing);
    }

    #[test]
    fn test_sentence_summary_defers_to_operation_id() {
        let d = derive_display_name(source(
            Some("List Foo Bars"),
            Some("listFooBars"),
            "get",
            "/api/foo/v1/bars",
        ));
        assert_eq!(d.name, "listFooBars");
        assert_eq!(d.description, "List Foo Bars");
    }

    #[test]
    fn test_identifier_summary_is_the_name() {
        let d = derive_display_name(source(Some("listFooBars"), None, "get", "/bars"));
        assert_eq!(d.name, "listFooBars");
        assert_eq!(d.description, "listFooBars");
    }

    #[test]
    fn test_identifier_summary_keeps_description() {
        let d = derive_display_name(NameSource {
            description: Some("Lists all the bars"),
            ..source(Some("listFooBars"), Some("other"), "get", "/bars")
        });
        assert_eq!(d.name, "listFooBars");
        assert_eq!(d.description, "Lists all the bars");
    }

    #[test]
    fn test_phrase_summary_without_operation_id() {
        let d = derive_display_name(source(
            Some("Delete Bar"),
            None,
            "delete",
            "/api/foo/v1/bar/{bar_id}/baz/{baz_id}",
        ));
        assert_eq!(d.name, "Delete Bar");
        assert_eq!(d.description, "Delete Bar");
        assert_eq!(function_name(&d.name), "deleteBar");
        assert_eq!(type_stem(&d.name), "DeleteBar");
    }

    #[test]
    fn test_non_english_summary_falls_back_to_path() {
        let d = derive_display_name(source(
            Some("创建小模型"),
            None,
            "post",
            "/api/lightModel/create",
        ));
        assert_eq!(d.name, "createLightModel");
        assert_eq!(d.description, "创建小模型");
    }

    #[test]
    fn test_operation_id_is_camel_cased() {
        let d = derive_display_name(source(None, Some("get-pet-by-id"), "get", "/pet/{id}"));
        assert_eq!(d.name, "getPetById");
        assert_eq!(d.description, "getPetById");
    }

    #[test]
    fn test_missing_everything_uses_path() {
        let d = derive_display_name(source(None, None, "get", "/users/{userId}"));
        assert_eq!(d.name, "users");
        let d = derive_display_name(source(None, None, "get", "/lightModel"));
        assert_eq!(d.name, "lightModel");
        let d = derive_display_name(source(None, None, "get", "/"));
        assert_eq!(d.name, "get");
    }

    #[test]
    fn test_phrase_summary_keeps_description() {
        let d = derive_display_name(NameSource {
            description: Some("Deletes a bar permanently"),
            ..source(Some("Delete Bar"), None, "delete", "/bar/{id}")
        });
        assert_eq!(d.name, "Delete Bar");
        assert_eq!(d.description, "Deletes a bar permanently");
    }

    #[test]
    fn test_sentence_summary_wins_over_description() {
        let d = derive_display_name(NameSource {
            description: Some("Longer text"),
            ..source(Some("Update an existing pet."), Some("updatePet"), "put", "/pet")
        });
        assert_eq!(d.name, "updatePet");
        assert_eq!(d.description, "Update an existing pet.");
    }

    #[test]
    fn test_non_identifier_operation_id_falls_back_to_path() {
        let d = derive_display_name(source(None, Some("获取列表"), "get", "/api/goods/list"));
        assert_eq!(d.name, "listGoods");
        assert_eq!(type_stem(&d.name), "ListGoods");

        let d = derive_display_name(source(None, Some("2fa-verify"), "post", "/auth/2fa/verify"));
        assert_eq!(d.name, "auth2faVerify");
        assert!(is_identifier(&function_name(&d.name)));
    }

    #[test]
    fn test_path_to_camel_case() {
        assert_eq!(path_to_camel_case("/lightModel/create"), "createLightModel");
        assert_eq!(path_to_camel_case("api/lightModel/create"), "createLightModel");
        assert_eq!(path_to_camel_case("lightModel"), "lightModel");
        assert_eq!(path_to_camel_case("/light-model/create"), "createLightModel");
        assert_eq!(path_to_camel_case("/light_model/create"), "createLightModel");
        assert_eq!(path_to_camel_case("/model/{id}/delete"), "deleteModel");
    }

    #[test]
    fn test_path_to_name() {
        assert_eq!(path_to_name("post", "/api/lightModel/create"), "createLightModel");
        assert_eq!(path_to_name("get", "/users/{userId}/messages"), "usersMessages");
        assert_eq!(path_to_name("get", "/2fa"), "get2fa");
        assert_eq!(path_to_name("get", "/用户/列表"), "get");
        assert_eq!(path_to_name("delete", "/api"), "delete");
    }

    #[test]
    fn test_verb_to_noun() {
        assert_eq!(verb_to_noun("bars"), "bar");
        assert_eq!(verb_to_noun("created"), "creat");
        assert_eq!(verb_to_noun("streaming"), "stream");
        assert_eq!(verb_to_noun("evaluate"), "evaluation");
        assert_eq!(verb_to_noun("pet"), "pet");
    }

    #[test]
    fn test_to_service_name() {
        assert_eq!(to_service_name("foo/evaluate"), "evaluation");
        assert_eq!(to_service_name("/api/foo/v1/bar/{bar_id}/baz/{baz_id}"), "baz");
        assert_eq!(to_service_name("/api/foo/v1/bar/{bar_id}/{baz_id}"), "bar");
        assert_eq!(to_service_name("/api/light-model"), "lightModel");
        assert_eq!(to_service_name(""), "");
    }

    #[test]
    fn test_common_path_prefix() {
        assert_eq!(
            common_path_prefix(&["/api/v3/pet", "/api/v3/pet/{petId}", "/api/v3/pet/findByStatus"]),
            "/api/v3/pet"
        );
        assert_eq!(
            common_path_prefix(&["/api/v3/store/order", "/api/v3/store/inventory"]),
            "/api/v3/store"
        );
        assert_eq!(common_path_prefix(&["/a/b/"]), "/a/b");
        assert_eq!(common_path_prefix(&["/foo", "/bar"]), "");
        assert_eq!(common_path_prefix::<&str>(&[]), "");
    }

    #[test]
    fn test_static_prefix() {
        assert_eq!(static_prefix("/api/foo/{id}"), "/api/foo");
        assert_eq!(static_prefix("/api/foo/{id"), "/api/foo");
        assert_eq!(static_prefix("/api/foo"), "/api/foo");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("pet"));
        assert!(is_identifier("$store_2"));
        assert!(!is_identifier("pet store"));
        assert!(!is_identifier("2pets"));
    }
}
