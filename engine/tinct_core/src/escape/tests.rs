use super::*;

/// Count how many bytes of `tail` the escape consumes before `at_end`.
fn consumed(budget: u8, radix: u32, tail: &[u8]) -> usize {
    let mut esc = EscapeSequence::new(());
    esc.enter((), budget, radix);
    tail.iter().take_while(|&&ch| !esc.at_end(ch)).count()
}

#[test]
fn simple_escape_consumes_nothing_more() {
    // `\n` is fully consumed by the introducer step.
    assert_eq!(consumed(SIMPLE, 16, b"abc"), 0);
}

#[test]
fn hex_pair_takes_two_digits() {
    assert_eq!(consumed(HEX_PAIR, 16, b"41zz"), 2);
    assert_eq!(consumed(HEX_PAIR, 16, b"4123"), 2);
}

#[test]
fn stops_early_on_non_digit() {
    assert_eq!(consumed(UNICODE_SHORT, 16, b"4g00"), 1);
    assert_eq!(consumed(UNICODE_SHORT, 16, b"\"rest"), 0);
}

#[test]
fn octal_radix_rejects_eight() {
    assert_eq!(consumed(HEX_PAIR, 8, b"78"), 1);
}

#[test]
fn long_unicode_budget() {
    assert_eq!(consumed(UNICODE_LONG, 16, b"0001F600x"), 8);
}

#[test]
fn enter_resets_brace_and_outer() {
    let mut esc = EscapeSequence::new(1u8);
    esc.brace = true;
    esc.enter(2, HEX_PAIR, 8);
    assert_eq!(esc.outer, 2);
    assert!(!esc.brace);
    assert_eq!(esc.radix, 8);
}
