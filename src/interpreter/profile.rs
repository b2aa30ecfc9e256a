//! Shell capability profiles
//!
//! Every target shell runs the same interpreter algorithm. What differs is
//! captured here: whether the shell can suppress the trailing space itself,
//! how it displays descriptions, which characters break words, and whether it
//! can filter native file completion.

use clap_complete::Shell;

/// How a shell displays candidate descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionStyle {
    /// Aligned `text  (description)` columns sized to the terminal (bash)
    Columns,

    /// `text:description` with `:` in the text escaped (zsh `_describe`)
    Colon,

    /// `text<TAB>description` (fish, powershell)
    Tab,

    /// Descriptions are never shown
    None,
}

/// Capabilities of one target shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellProfile {
    /// Shell name as used on the command line
    pub name: &'static str,

    /// The shell can be told not to append a space after a completion
    pub has_native_nospace: bool,

    /// Description rendering
    pub description_style: DescriptionStyle,

    /// Characters the shell treats as word boundaries while completing
    pub word_breaks: &'static [char],

    /// The shell can restrict native file completion by extension or directory
    pub native_file_filter: bool,

    /// Replies to `--flag=<value>` must carry the `--flag=` prefix
    pub prefix_flag_values: bool,
}

impl ShellProfile {
    pub const BASH: ShellProfile = ShellProfile {
        name: "bash",
        has_native_nospace: true,
        description_style: DescriptionStyle::Columns,
        word_breaks: &[':', '='],
        native_file_filter: true,
        prefix_flag_values: false,
    };

    pub const ZSH: ShellProfile = ShellProfile {
        name: "zsh",
        has_native_nospace: true,
        description_style: DescriptionStyle::Colon,
        word_breaks: &[],
        native_file_filter: true,
        prefix_flag_values: true,
    };

    pub const FISH: ShellProfile = ShellProfile {
        name: "fish",
        has_native_nospace: false,
        description_style: DescriptionStyle::Tab,
        word_breaks: &[],
        native_file_filter: false,
        prefix_flag_values: true,
    };

    pub const POWERSHELL: ShellProfile = ShellProfile {
        name: "powershell",
        has_native_nospace: true,
        description_style: DescriptionStyle::Tab,
        word_breaks: &[],
        native_file_filter: false,
        prefix_flag_values: true,
    };

    /// Profile for a `clap_complete` shell, if supported
    pub fn for_shell(shell: Shell) -> Option<Self> {
        match shell {
            Shell::Bash => Some(Self::BASH),
            Shell::Zsh => Some(Self::ZSH),
            Shell::Fish => Some(Self::FISH),
            Shell::PowerShell => Some(Self::POWERSHELL),
            _ => None,
        }
    }

    /// Profile by name, case-insensitive; `pwsh` is accepted for powershell
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bash" => Some(Self::BASH),
            "zsh" => Some(Self::ZSH),
            "fish" => Some(Self::FISH),
            "powershell" | "pwsh" => Some(Self::POWERSHELL),
            _ => None,
        }
    }
}
