//! Test utilities shared across unit tests, integration tests and benches.
//!
//! This module is always compiled but hidden from documentation.
//! It lays out synthetic OCR pages with consistent word, line and block
//! geometry so tests don't have to hand-write coordinates.

#![doc(hidden)]

use crate::geometry::NormBBox;
use crate::types::{Granularity, OcrPageResult, TextBlock};
use std::collections::BTreeMap;

/// Width of one character, in normalized units.
pub const CHAR_WIDTH: f64 = 0.01;
/// Gap between words on a line.
pub const WORD_GAP: f64 = 0.01;
/// Height of a line.
pub const LINE_HEIGHT: f64 = 0.02;
/// Vertical distance between consecutive line tops.
pub const LINE_PITCH: f64 = 0.03;
/// Extra vertical gap between blocks.
pub const BLOCK_GAP: f64 = 0.05;
/// Left margin of every line.
pub const LEFT_MARGIN: f64 = 0.05;
/// Top of the first line.
pub const TOP_MARGIN: f64 = 0.05;

/// Create a word block.
pub fn make_word(text: &str, x0: f64, top: f64) -> TextBlock {
    let width = text.chars().count() as f64 * CHAR_WIDTH;
    TextBlock::new(text, Granularity::Word, NormBBox::new(x0, top, x0 + width, top + LINE_HEIGHT))
}

/// Lay out a page from blocks of lines of words.
///
/// Each block's text is its lines joined by single spaces; each line's text
/// is its words joined by single spaces. Lines start at [`LEFT_MARGIN`] and
/// stack downwards.
pub fn make_page_with_blocks(blocks: &[&[&[&str]]]) -> OcrPageResult {
    let mut page = OcrPageResult {
        provider_name: "synthetic".to_string(),
        ..Default::default()
    };
    let mut top = TOP_MARGIN;
    let mut page_lines = Vec::new();

    for lines in blocks {
        let mut block_lines = Vec::new();
        let mut block_boxes = Vec::new();

        for words in lines.iter() {
            let mut x0 = LEFT_MARGIN;
            let mut line_words = Vec::new();
            for text in words.iter() {
                let word = make_word(text, x0, top);
                x0 = word.bounding_box.x1 + WORD_GAP;
                line_words.push(word);
            }

            let line_text = words.join(" ");
            if let Some(line_box) = NormBBox::combine(line_words.iter().map(|w| &w.bounding_box)) {
                page.line_level_blocks.push(TextBlock::new(line_text.clone(), Granularity::Line, line_box));
                block_boxes.push(line_box);
            }
            page.word_level_blocks.extend(line_words);
            block_lines.push(line_text.clone());
            page_lines.push(line_text);
            top += LINE_PITCH;
        }

        if let Some(block_box) = NormBBox::combine(block_boxes.iter()) {
            page.block_level_blocks.push(TextBlock::new(block_lines.join(" "), Granularity::Block, block_box));
        }
        top += BLOCK_GAP;
    }

    page.page_text = page_lines.join("\n");
    page
}

/// A page with a single block made of `lines`.
pub fn make_page(lines: &[&[&str]]) -> OcrPageResult {
    make_page_with_blocks(&[lines])
}

/// Input for `DocumentProvenanceLocator::build` holding one page, numbered 1.
pub fn single_page(lines: &[&[&str]]) -> BTreeMap<u32, Option<OcrPageResult>> {
    let mut pages = BTreeMap::new();
    pages.insert(1, Some(make_page(lines)));
    pages
}

/// Input for `DocumentProvenanceLocator::build` with pages numbered from 1.
pub fn make_pages(pages: Vec<OcrPageResult>) -> BTreeMap<u32, Option<OcrPageResult>> {
    pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| (i as u32 + 1, Some(page)))
        .collect()
}

/// An empty page: no words, lines or blocks.
pub fn make_empty_page() -> OcrPageResult {
    OcrPageResult {
        provider_name: "synthetic".to_string(),
        ..Default::default()
    }
}
