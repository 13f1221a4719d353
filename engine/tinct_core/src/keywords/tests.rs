use super::*;

// === KeywordSet ===

#[test]
fn case_sensitive_membership() {
    let set = KeywordSet::new("class  enum\nvoid", CaseSensitivity::Sensitive);
    assert_eq!(set.len(), 3);
    assert!(set.contains("class"));
    assert!(!set.contains("Class"));
    assert!(!set.contains(""));
}

#[test]
fn case_insensitive_membership() {
    let set = KeywordSet::new("Get-ChildItem foreach", CaseSensitivity::Insensitive);
    assert!(set.contains("get-childitem"));
    assert!(set.contains("FOREACH"));
    assert!(!set.contains("for"));
}

#[test]
fn suffixed_entries() {
    let set = KeywordSet::new("if( endif( set", CaseSensitivity::Insensitive);
    assert!(set.contains_with_suffix("IF", b'('));
    assert!(set.contains_with_suffix("set", b'('));
    assert!(!set.contains("if"));
    assert!(!set.contains_with_suffix("while", b'('));
}

#[test]
fn long_lookups_fall_back_to_allocation() {
    let word = "x".repeat(100);
    let set = KeywordSet::new(&format!("{word}("), CaseSensitivity::Sensitive);
    assert!(set.contains_with_suffix(&word, b'('));
    assert!(!set.contains(&word));
}

#[test]
fn non_ascii_lookup_does_not_match_ascii_word() {
    let set = KeywordSet::new("cafe", CaseSensitivity::Insensitive);
    assert!(!set.contains("café"));
}

// === KeywordLists ===

#[test]
fn missing_index_is_empty() {
    let lists = KeywordLists::from_texts(["a b"], CaseSensitivity::Sensitive);
    assert!(lists.contains(0, "a"));
    assert!(!lists.contains(3, "a"));
    assert!(!lists.contains_with_suffix(3, "a", b'('));
}

#[test]
fn set_pads_with_empty_lists() {
    let mut lists = KeywordLists::default();
    lists.set(2, KeywordSet::new("x", CaseSensitivity::Sensitive));
    assert_eq!(lists.len(), 3);
    assert!(lists.get(0).is_some_and(KeywordSet::is_empty));
    assert!(lists.contains(2, "x"));
}
