mod common;

use common::{Shellcomp, bin};

const NO_MORE_ARGS: &str = "This command does not take any more arguments (but may accept flags).";

// ============================================================================
// protocol requests
// ============================================================================

#[test]
fn complete_lists_subcommands_in_order() {
    let stdout = Shellcomp::new().stdout(&["__complete", "completion", ""]);
    let lines: Vec<&str> = stdout.lines().collect();

    let names: Vec<&str> = lines[..lines.len() - 1]
        .iter()
        .map(|line| line.split('\t').next().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["bash", "zsh", "fish", "powershell", "help"]);
    assert!(lines[0].contains('\t'), "descriptions expected: {stdout}");
    assert_eq!(lines.last(), Some(&"4"));
}

#[test]
fn complete_no_more_arguments_hint() {
    let stdout = Shellcomp::new().stdout(&["__complete", "completion", "bash", ""]);
    assert_eq!(stdout, format!("_info_ {NO_MORE_ARGS}\n4\n"));
}

#[test]
fn complete_no_desc() {
    let stdout = Shellcomp::new().stdout(&["__completeNoDesc", "comp"]);
    assert_eq!(stdout, "completion\n4\n");
}

#[test]
fn complete_flags_are_not_parsed_as_own_flags() {
    let stdout = Shellcomp::new().stdout(&["__complete", "--vv"]);
    assert!(stdout.lines().any(|line| line == "--vv\tVery verbose mode (trace logging)"));
}

#[test]
fn complete_unknown_flag_reports_error_directive() {
    let stdout = Shellcomp::new().stdout(&["__complete", "--bogus", ""]);
    assert_eq!(stdout, "1\n");
}

#[test]
fn complete_config_file_filters_extensions() {
    let stdout = Shellcomp::new().stdout(&["__complete", "config", "validate", "--file", ""]);
    assert_eq!(stdout, "toml\n8\n");
}

// ============================================================================
// interpreter
// ============================================================================

#[test]
fn shell_bash_formats_columns() {
    let stdout = Shellcomp::new().stdout(&[
        "__complete-shell",
        "bash",
        "--columns",
        "80",
        "--",
        bin(),
        "completion",
        "",
    ]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "action complete");
    assert_eq!(lines[1], "opt nofiles");

    let replies: Vec<&str> = lines.iter().filter(|l| l.starts_with("reply ")).copied().collect();
    assert_eq!(replies.len(), 5);
    assert!(replies[0].starts_with("reply bash        ("), "{stdout}");
}

#[test]
fn shell_single_match_has_no_description() {
    let stdout = Shellcomp::new().stdout(&["__complete-shell", "fish", "--", bin(), "completion", "ba"]);
    assert_eq!(stdout, "action complete\nopt nofiles\nreply bash\n");
}

#[test]
fn shell_info_lines() {
    let shellcomp = Shellcomp::new();
    let args = ["__complete-shell", "bash", "--", bin(), "completion", "bash", ""];
    let stdout = shellcomp.stdout(&args);
    assert_eq!(
        stdout,
        format!("action complete\nopt nofiles\ninfo {NO_MORE_ARGS}\n")
    );

    let stdout = shellcomp.stdout(&[
        "__complete-shell",
        "bash",
        "--no-hints",
        "--",
        bin(),
        "completion",
        "bash",
        "",
    ]);
    assert_eq!(stdout, "action complete\nopt nofiles\n");
}

#[test]
fn shell_file_filter_per_profile() {
    let shellcomp = Shellcomp::new();
    let words = [bin(), "config", "validate", "--file", ""];

    let mut args = vec!["__complete-shell", "zsh", "--"];
    args.extend(words);
    assert_eq!(shellcomp.stdout(&args), "action ext\narg toml\n");

    let mut args = vec!["__complete-shell", "fish", "--"];
    args.extend(words);
    assert_eq!(shellcomp.stdout(&args), "action fallback\n");
}

#[test]
fn shell_missing_program_falls_back() {
    let stdout = Shellcomp::new().stdout(&[
        "__complete-shell",
        "bash",
        "--",
        "/nonexistent/shellcomp-missing",
        "x",
    ]);
    assert_eq!(stdout, "action fallback\n");
}

#[test]
fn shell_bash_respects_word_breaks() {
    let shellcomp = Shellcomp::new();
    let words = [bin(), "completion", "ba"];

    let mut args = vec!["__complete-shell", "bash", "--word-breaks= \t\n\"'><=;|&(", "--"];
    args.extend(words);
    assert_eq!(shellcomp.stdout(&args), "action complete\nopt nofiles\nreply bash\n");
}

#[test]
fn shell_tolerates_broken_config() {
    let shellcomp = Shellcomp::new();
    let config = shellcomp.config_home().join("broken.toml");
    std::fs::write(&config, "[display\ncolumns = ").unwrap();

    let stdout = shellcomp.stdout(&[
        "--config",
        config.to_str().unwrap(),
        "__complete-shell",
        "fish",
        "--",
        bin(),
        "completion",
        "ba",
    ]);
    assert_eq!(stdout, "action complete\nopt nofiles\nreply bash\n");

    let output = shellcomp.run(&["--config", config.to_str().unwrap(), "config", "show"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn shell_unknown_shell_fails() {
    let output = Shellcomp::new().run(&["__complete-shell", "elvish", "--", bin(), ""]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported shell: elvish"));
}

#[test]
fn shell_writes_debug_file() {
    let shellcomp = Shellcomp::new();
    let trace = shellcomp.config_home().join("comp-debug.log");
    let shellcomp = shellcomp.env("BASH_COMP_DEBUG_FILE", trace.to_str().unwrap());

    shellcomp.stdout(&["__complete-shell", "bash", "--", bin(), "comp"]);

    let content = std::fs::read_to_string(&trace).expect("debug file should exist");
    assert!(content.contains("starting completion logic"), "{content}");
}

// ============================================================================
// scripts
// ============================================================================

#[test]
fn completion_scripts() {
    let shellcomp = Shellcomp::new();

    let bash = shellcomp.stdout(&["completion", "bash"]);
    assert!(bash.contains("__start_shellcomp()"));
    assert!(bash.contains("complete -o default -F __start_shellcomp shellcomp"));
    assert!(bash.contains("--word-breaks=\"$COMP_WORDBREAKS\""));

    let zsh = shellcomp.stdout(&["completion", "zsh", "--no-descriptions"]);
    assert!(zsh.starts_with("#compdef shellcomp"));
    assert!(zsh.contains("__complete-shell zsh ${COLUMNS:+--columns=$COLUMNS} --no-descriptions --"));

    let fish = shellcomp.stdout(&["completion", "fish"]);
    assert!(fish.contains("complete -c shellcomp -e"));

    let pwsh = shellcomp.stdout(&["completion", "pwsh"]);
    assert!(pwsh.contains("Register-ArgumentCompleter -CommandName 'shellcomp'"));
}

#[test]
fn completion_rejects_unknown_shell() {
    let output = Shellcomp::new().run(&["completion", "elvish"]);
    assert!(!output.status.success());
}

// ============================================================================
// config and version
// ============================================================================

#[test]
fn config_init_then_validate() {
    let shellcomp = Shellcomp::new();
    let dir = shellcomp.config_home().join("custom");
    let dir_arg = dir.to_str().unwrap();

    let stdout = shellcomp.stdout(&["config", "init", "--dir", dir_arg]);
    assert!(stdout.contains("Wrote default configuration"));

    let file = dir.join("config.toml");
    let stdout = shellcomp.stdout(&["config", "validate", "--file", file.to_str().unwrap()]);
    assert!(stdout.contains("Configuration is valid"));

    let output = shellcomp.run(&["config", "init", "--dir", dir_arg]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn config_show_prints_toml() {
    let stdout = Shellcomp::new().stdout(&["config", "show"]);
    assert!(stdout.contains("[completion]"));
    assert!(stdout.contains("columns = 80"));
}

#[test]
fn version_human() {
    let stdout = Shellcomp::new().stdout(&["version"]);
    assert!(stdout.contains("shellcomp version"));
    assert!(stdout.contains('.'));
}
