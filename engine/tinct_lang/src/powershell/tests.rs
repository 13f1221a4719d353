use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{assert_resumes, highlight, level_pairs, runs, style_of};
use tinct_core::TextDocument;

fn ps(text: &str) -> TextDocument {
    highlight(&PowerShell, &default_keywords(), text)
}

fn state(doc: &TextDocument, line: usize) -> PowerShellState {
    PowerShellState::decode(doc.line_states()[line]).unwrap()
}

#[test]
fn state_round_trips() {
    for resume in RESUME_STYLES {
        let state = PowerShellState {
            resume,
            blank: false,
        };
        assert_eq!(PowerShellState::decode(state.encode()), Ok(state));
    }
    let blank = PowerShellState {
        resume: PowerShellStyle::Default,
        blank: true,
    };
    assert_eq!(PowerShellState::decode(blank.encode()), Ok(blank));
    // Blank inside a comment.
    assert!(PowerShellState::decode(1 | 1 << 2).is_err());
    assert!(PowerShellState::decode(1 << 3).is_err());
}

#[test]
fn blank_and_multiline_flags() {
    let doc = ps("<# a
  
#>

x
");
    assert_eq!(state(&doc, 0).flags(), LineFlags::MULTILINE);
    // Whitespace inside the comment is not a blank line.
    assert_eq!(state(&doc, 1).flags(), LineFlags::MULTILINE);
    assert_eq!(state(&doc, 2).flags(), LineFlags::empty());
    assert_eq!(state(&doc, 3).flags(), LineFlags::BLANK);
    assert_eq!(state(&doc, 4).flags(), LineFlags::empty());
}

#[test]
fn function_with_parameters() {
    let doc = ps("function Get-Thing {\n  param($Name)\n  Write-Host \"Hi $Name\"\n}\n");
    assert_eq!(
        runs::<PowerShell>(&doc),
        vec![
            ("function".to_string(), PowerShellStyle::Keyword),
            ("Get-Thing".to_string(), PowerShellStyle::Identifier),
            ("{".to_string(), PowerShellStyle::Operator),
            ("param".to_string(), PowerShellStyle::Keyword),
            ("(".to_string(), PowerShellStyle::Operator),
            ("$Name".to_string(), PowerShellStyle::Variable),
            (")".to_string(), PowerShellStyle::Operator),
            ("Write-Host".to_string(), PowerShellStyle::Cmdlet),
            ("\"Hi $Name\"".to_string(), PowerShellStyle::StringDq),
            ("}".to_string(), PowerShellStyle::Operator),
        ]
    );
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 1), (1, 1), (1, 0), (0, 0)]);
}

#[test]
fn keyword_lists_ignore_case() {
    let doc = ps("GCI | Sort\nIF ($x) { Foreach-Object }\n");
    assert_eq!(style_of::<PowerShell>(&doc, "GCI"), PowerShellStyle::Alias);
    assert_eq!(style_of::<PowerShell>(&doc, "|"), PowerShellStyle::Operator);
    assert_eq!(style_of::<PowerShell>(&doc, "Sort"), PowerShellStyle::Alias);
    assert_eq!(style_of::<PowerShell>(&doc, "IF"), PowerShellStyle::Keyword);
    assert_eq!(style_of::<PowerShell>(&doc, "Foreach-Object"), PowerShellStyle::Cmdlet);
}

#[test]
fn user_words_come_last() {
    let mut keywords = default_keywords();
    keywords.set(4, tinct_core::KeywordSet::new("Deploy-App", CaseSensitivity::Insensitive));
    let doc = highlight(&PowerShell, &keywords, "deploy-app -Force\n");
    assert_eq!(style_of::<PowerShell>(&doc, "deploy-app"), PowerShellStyle::User1);
    assert_eq!(style_of::<PowerShell>(&doc, "-Force"), PowerShellStyle::Operator);
    assert_eq!(style_of::<PowerShell>(&doc, "Force"), PowerShellStyle::Identifier);
}

#[test]
fn numbers_and_operator_runs() {
    let doc = ps("$a += 10 -5.5\n");
    assert_eq!(style_of::<PowerShell>(&doc, "+="), PowerShellStyle::Operator);
    assert_eq!(style_of::<PowerShell>(&doc, "= "), PowerShellStyle::Operator);
    assert_eq!(style_of::<PowerShell>(&doc, "10"), PowerShellStyle::Number);
    assert_eq!(style_of::<PowerShell>(&doc, "-5"), PowerShellStyle::Operator);
    assert_eq!(style_of::<PowerShell>(&doc, "5.5"), PowerShellStyle::Number);
    assert_eq!(style_of::<PowerShell>(&doc, ".5"), PowerShellStyle::Number);
}

#[test]
fn comments_and_block_comments() {
    let text = "# TODO fix\n<# block\n  text #>\n$x = 1 <#> y\n";
    let doc = ps(text);
    assert_eq!(style_of::<PowerShell>(&doc, "# "), PowerShellStyle::Comment);
    assert_eq!(style_of::<PowerShell>(&doc, "TODO"), PowerShellStyle::TaskMarker);
    assert_eq!(style_of::<PowerShell>(&doc, "fix"), PowerShellStyle::Comment);
    assert_eq!(state(&doc, 1).resume, PowerShellStyle::CommentStream);
    assert_eq!(style_of::<PowerShell>(&doc, "text"), PowerShellStyle::CommentStream);
    assert_eq!(style_of::<PowerShell>(&doc, "#>"), PowerShellStyle::CommentStream);
    assert_eq!(state(&doc, 2).resume, PowerShellStyle::Default);
    assert_eq!(style_of::<PowerShell>(&doc, "<#>"), PowerShellStyle::CommentStream);
    assert_eq!(style_of::<PowerShell>(&doc, "y"), PowerShellStyle::Identifier);
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 0), (0, 1), (1, 0), (0, 0), (0, 0)]
    );
    assert_resumes(&PowerShell, &default_keywords(), text);
}

#[test]
fn strings_span_lines_without_escapes() {
    let text = "'a\nb' \"c\nd`\"\nx\n";
    let doc = ps(text);
    assert_eq!(state(&doc, 0).resume, PowerShellStyle::StringSq);
    assert_eq!(state(&doc, 1).resume, PowerShellStyle::StringDq);
    assert_eq!(state(&doc, 2).resume, PowerShellStyle::Default);
    assert_eq!(style_of::<PowerShell>(&doc, "b'"), PowerShellStyle::StringSq);
    assert_eq!(style_of::<PowerShell>(&doc, "d`\""), PowerShellStyle::StringDq);
    assert_eq!(style_of::<PowerShell>(&doc, "x"), PowerShellStyle::Identifier);
    assert_eq!(level_pairs(&doc), vec![(0, 0); 5]);
    assert_resumes(&PowerShell, &default_keywords(), text);
}

#[test]
fn nested_braces_fold() {
    let text = "if ($a) {\n  if ($b) { x }\n}\n";
    let doc = ps(text);
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 1), (1, 0), (0, 0)]);
    assert_resumes(&PowerShell, &default_keywords(), text);
}
