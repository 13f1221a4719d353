use std::path::Path;

use pretty_assertions::assert_eq;

use super::*;
use tinct_core::DocumentMut;

#[test]
fn names_round_trip() {
    for &lang in Language::all() {
        assert_eq!(Language::from_name(lang.name()), Some(lang));
        assert_eq!(lang.to_string(), lang.name());
    }
    assert_eq!(Language::from_name("PWSH"), Some(Language::PowerShell));
    assert_eq!(Language::from_name("asy"), Some(Language::Asymptote));
    assert_eq!(Language::from_name("F#"), Some(Language::FSharp));
    assert_eq!(Language::from_name("VHDL"), Some(Language::Vhdl));
    assert_eq!(Language::from_name("fortran"), None);
}

#[test]
fn paths_and_extensions() {
    assert_eq!(Language::from_extension("DART"), Some(Language::Dart));
    assert_eq!(Language::from_extension("psm1"), Some(Language::PowerShell));
    assert_eq!(Language::from_extension("txt"), None);
    assert_eq!(
        Language::from_path(Path::new("project/CMakeLists.txt")),
        Some(Language::CMake)
    );
    assert_eq!(
        Language::from_path(Path::new("cmake/FindFoo.cmake")),
        Some(Language::CMake)
    );
    assert_eq!(Language::from_path(Path::new("fig.asy")), Some(Language::Asymptote));
    assert_eq!(Language::from_path(Path::new("Program.fsx")), Some(Language::FSharp));
    assert_eq!(Language::from_path(Path::new("rtl/top.vhd")), Some(Language::Vhdl));
    assert_eq!(Language::from_path(Path::new("notes.txt")), None);
    assert_eq!(Language::from_path(Path::new("Makefile")), None);
}

#[test]
fn keyword_case_follows_the_defaults() {
    assert_eq!(Language::CMake.keyword_case(1), CaseSensitivity::Insensitive);
    assert_eq!(Language::CMake.keyword_case(2), CaseSensitivity::Sensitive);
    assert_eq!(Language::PowerShell.keyword_case(4), CaseSensitivity::Insensitive);
    assert_eq!(Language::Dart.keyword_case(0), CaseSensitivity::Sensitive);
    assert_eq!(Language::FSharp.keyword_case(1), CaseSensitivity::Sensitive);
    assert_eq!(Language::Vhdl.keyword_case(8), CaseSensitivity::Insensitive);
}

#[test]
fn style_tables_start_at_default() {
    for &lang in Language::all() {
        let names = lang.style_names();
        assert_eq!(names[0], "default");
        assert_eq!(lang.style_name(0), Some("default"));
        assert_eq!(lang.style_name(u8::try_from(names.len()).unwrap()), None);
    }
}

#[test]
fn dispatch_matches_the_lexer() {
    let text = "set(x ${a})\n";
    let lang = Language::CMake;
    let doc = lang.highlight(text, &lang.default_keywords()).unwrap();
    let direct = crate::cmake::CMake;
    let mut expected = TextDocument::new(text);
    let keywords = crate::cmake::default_keywords();
    scan(&direct, &expected, 0, text.len(), &keywords)
        .unwrap()
        .apply(&mut expected);
    assert_eq!(doc.styles(), expected.styles());
    assert_eq!(doc.line_states(), expected.line_states());
}

#[test]
fn describes_states() {
    let lang = Language::PowerShell;
    assert_eq!(
        lang.describe_state(1).unwrap(),
        "PowerShellState { resume: CommentStream, blank: false }"
    );
    assert!(lang.describe_state(1 << 3).is_err());
}

#[test]
fn highlighted_documents_have_no_divergence() {
    let samples = [
        (Language::Dart, "var s = '''a ${b + \"c\"}\nd''';\n/* x\n/* y */ */\n"),
        (Language::Asymptote, "real f(real x)\n{\n  return \"a\nb\";\n}\n"),
        (Language::CMake, "set(x [=[a\nb]=] \"${c\nd}\")\n"),
        (Language::PowerShell, "<# a\nb #> 'c\nd'\n"),
        (Language::FSharp, "let s = $\"\"\"a {\n  f (x,\n y)} b\"\"\"\n(* c\n(* d *) *)\n"),
        (Language::Vhdl, "u1:\n entity work.x;\nprocedure p(a : bit;\n b : bit) is\n/* c\nd */\n"),
    ];
    for (lang, text) in samples {
        let keywords = lang.default_keywords();
        let doc = lang.highlight(text, &keywords).unwrap();
        assert_eq!(lang.first_divergence(&doc, &keywords).unwrap(), None, "{lang}");
    }
}

#[test]
fn stale_states_are_reported() {
    let lang = Language::PowerShell;
    let keywords = lang.default_keywords();
    let mut doc = lang.highlight("'a\nb'\nc\n", &keywords).unwrap();
    // Pretend line 0 ended at top level.
    doc.set_line_state(0, 0);
    assert_eq!(
        lang.first_divergence(&doc, &keywords).unwrap(),
        Some(Divergence { line: 0, pos: None })
    );
}

#[test]
fn stale_styles_are_reported() {
    let lang = Language::PowerShell;
    let keywords = lang.default_keywords();
    let mut doc = lang.highlight("'a\nb'\nc\n", &keywords).unwrap();
    doc.set_styles(3, &[0]);
    assert_eq!(
        lang.first_divergence(&doc, &keywords).unwrap(),
        Some(Divergence {
            line: 1,
            pos: Some(3)
        })
    );
}

#[test]
fn undecodable_states_are_errors() {
    let lang = Language::CMake;
    let keywords = lang.default_keywords();
    let mut doc = lang.highlight("a\nb\n", &keywords).unwrap();
    doc.set_line_state(0, u32::MAX);
    assert!(matches!(
        lang.first_divergence(&doc, &keywords),
        Err(InvalidState::LineState { line: 0, .. })
    ));

    // The last line is checked too, though nothing resumes from it.
    let mut doc = lang.highlight("a\nb\n", &keywords).unwrap();
    doc.set_line_state(2, u32::MAX);
    assert!(matches!(
        lang.first_divergence(&doc, &keywords),
        Err(InvalidState::LineState { line: 2, .. })
    ));
}
