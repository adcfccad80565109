// Plain-text rendering of topic reports.
//
// Reports are written to any `io::Write` sink so they can be checked in tests
// without capturing stdout. The CLI passes a locked stdout.

use std::io::{self, Write};

use crate::pipeline::classifier::ChatTopics;
use crate::pipeline::TopicBlock;

/// Render one topic: its rank and its words joined by " | ".
pub fn write_topic_block<W: Write>(out: &mut W, block: &TopicBlock) -> io::Result<()> {
    writeln!(out, "Topic: {}", block.rank)?;
    writeln!(out, "Topic Representations: {}", super::join_words(&block.words))
}

/// Render the reporter's topics, each block surrounded by blank lines.
pub fn write_top_topics<W: Write>(out: &mut W, blocks: &[TopicBlock]) -> io::Result<()> {
    for block in blocks {
        writeln!(out)?;
        write_topic_block(out, block)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Render a transcript's topics under a header naming the file.
pub fn write_chat_topics<W: Write>(out: &mut W, report: &ChatTopics) -> io::Result<()> {
    writeln!(out, "Chat File: {}", report.path.display())?;
    for block in &report.topics {
        write_topic_block(out, block)?;
        writeln!(out)?;
    }
    Ok(())
}
