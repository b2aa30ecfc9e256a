//! Reply formatting per description style

use crate::protocol::Candidate;

use super::profile::DescriptionStyle;

/// Marker appended to truncated descriptions
pub const ELLIPSIS: char = '…';

/// Terminal geometry used to lay out column-styled replies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Terminal width in characters
    pub columns: usize,

    /// Descriptions are aligned only when at least this much room remains
    pub min_description_width: usize,

    /// Width of the widest candidate text in the reply set
    pub longest: usize,
}

/// Display width of a string, counted in characters
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Render one candidate as a reply line for the given style
///
/// # Arguments
/// * `candidate` - Candidate to render
/// * `style` - Description style of the target shell
/// * `layout` - Column geometry, only used by [`DescriptionStyle::Columns`]
///
/// # Returns
/// * `String` - Reply text handed to the shell
pub fn render(candidate: &Candidate, style: DescriptionStyle, layout: &ColumnLayout) -> String {
    let text = candidate.text();
    match (style, candidate.description()) {
        (DescriptionStyle::Columns, Some(description)) => columns(text, description, layout),
        (DescriptionStyle::Colon, Some(description)) => {
            format!("{}:{}", escape_colons(text), description)
        }
        (DescriptionStyle::Colon, None) => escape_colons(text),
        (DescriptionStyle::Tab, Some(description)) => format!("{text}\t{description}"),
        _ => text.to_string(),
    }
}

/// `text  (description)` aligned on `layout.longest`, truncated to the terminal width
fn columns(text: &str, description: &str, layout: &ColumnLayout) -> String {
    let columns = layout.columns as isize;
    let mut rendered = text.to_string();

    // Two spaces and two parentheses surround the description
    let mut max = columns - layout.longest as isize - 4;
    if max > layout.min_description_width as isize {
        let padding = layout.longest.saturating_sub(display_width(text));
        rendered.extend(std::iter::repeat_n(' ', padding));
    } else {
        max = columns - display_width(text) as isize - 4;
    }

    if max <= 0 {
        return rendered;
    }

    let max = max as usize;
    if display_width(description) > max {
        let truncated: String = description.chars().take(max - 1).collect();
        rendered.push_str(&format!("  ({truncated}{ELLIPSIS})"));
    } else {
        rendered.push_str(&format!("  ({description})"));
    }
    rendered
}

fn escape_colons(text: &str) -> String {
    text.replace(':', "\\:")
}
