//! Visual and visual-line selection handling.

mod common;
use common::*;

use core_text::Mode;

#[test]
fn v_toggles_visual_and_anchors() {
    let mut h = harness("hello");
    h.chars("v");
    assert_eq!(h.mode(), Mode::Visual);
    assert_eq!(h.buf.selection_anchor, Some((0, 0)));
    h.chars("v");
    assert_eq!(h.mode(), Mode::Normal);
    assert_eq!(h.buf.selection_anchor, None);
}

#[test]
fn escape_leaves_visual() {
    let mut h = harness("hello");
    h.chars("vll");
    h.esc();
    assert_eq!(h.mode(), Mode::Normal);
    assert_eq!(h.buf.selection_anchor, None);
}

#[test]
fn visual_delete_is_inclusive() {
    let mut h = harness("abcdef");
    h.chars("vlld");
    assert_eq!(h.text(), "def", "a through c removed");
    assert_eq!(h.mode(), Mode::Normal);
}

#[test]
fn visual_x_behaves_like_delete() {
    let mut h = harness("abcdef");
    h.chars("vllx");
    assert_eq!(h.text(), "def");
    assert_eq!(h.mode(), Mode::Normal);
}

#[test]
fn visual_change_enters_insert() {
    let mut h = harness("abcdef");
    h.chars("vlc");
    assert_eq!(h.mode(), Mode::Insert);
    h.chars("XY");
    h.esc();
    assert_eq!(h.text(), "XYcdef");
}

#[test]
fn visual_yank_returns_to_normal_and_fills_clipboard() {
    let mut h = harness("hello world");
    h.chars("vlly");
    assert_eq!(h.mode(), Mode::Normal);
    assert_eq!(h.buf.clipboard(), "hel");
    assert_eq!(h.text(), "hello world");
    assert_eq!(h.cursor(), (0, 0), "cursor lands at the selection start");
}

#[test]
fn visual_selection_survives_motions() {
    let mut h = harness("one two three");
    h.chars("v3w");
    assert_eq!(h.buf.selection_anchor, Some((0, 0)));
    assert_eq!(h.cursor(), (0, 12));
    h.chars("d");
    assert_eq!(h.text(), "", "selection through the last word start, inclusive");
}

#[test]
fn visual_line_deletes_whole_lines() {
    let mut h = harness("one\ntwo\nthree");
    h.chars("Vjd");
    assert_eq!(h.text(), "three");
    assert_eq!(h.buf.clipboard(), "one\ntwo\n");
    assert_eq!(h.mode(), Mode::Normal);
}

#[test]
fn visual_line_yank_then_paste() {
    let mut h = harness("one\ntwo");
    h.chars("Vy");
    assert_eq!(h.buf.clipboard(), "one\n");
    h.chars("jp");
    assert_eq!(h.text(), "one\ntwo\none");
}

#[test]
fn yank_selection_then_paste_before_reproduces_content() {
    let mut h = harness("abcd");
    h.chars("vly");
    assert_eq!(h.buf.clipboard(), "ab");
    h.chars("P");
    assert_eq!(h.text(), "ababcd");
}

#[test]
fn reversed_selection_is_normalized() {
    let mut h = harness("abcdef");
    h.chars("3lvhhd");
    assert_eq!(h.text(), "aef", "anchor after cursor still deletes b through d");
}
