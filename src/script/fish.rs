//! Fish completion script
//!
//! Fish has no message area, so info records are only traced.

pub(super) const TEMPLATE: &str = r#"# fish completion for @PROGRAM@                           -*- shell-script -*-

function __@FUNC@_debug
    set -l file "$BASH_COMP_DEBUG_FILE"
    if test -n "$file"
        echo "$argv" >> $file
    end
end

# Fill __@FUNC@_comp_results from the plan printed by `__complete-shell`.
# Returns false if file completion should be performed.
function __@FUNC@_prepare_completions
    __@FUNC@_debug ""
    __@FUNC@_debug "========= starting completion logic =========="

    # Start fresh
    set --erase __@FUNC@_comp_results
    set --global __@FUNC@_comp_results

    set -l args (commandline -opc)
    set -l current (commandline -ct)
    set -a args "$current"
    __@FUNC@_debug "args: $args"

    if not type -q "$args[1]"
        # This can happen when "complete --do-complete @PROGRAM@" is called when running this script.
        __@FUNC@_debug "Cannot find $args[1]. No completions."
        return 1
    end

    set -l plan ($args[1] __complete-shell fish@FLAGS@ -- $args 2>/dev/null)
    if test $status -ne 0
        __@FUNC@_debug "No completion plan, probably due to a failure"
        return 1
    end

    set -l action
    set -l fallback 0
    for line in $plan
        switch $line
            case 'action *'
                set action (string sub --start 8 -- $line)
            case 'opt fallback'
                set fallback 1
            case 'reply *'
                set -a __@FUNC@_comp_results (string sub --start 7 -- $line)
            case 'info *'
                __@FUNC@_debug "Info statement found: "(string sub --start 6 -- $line)
        end
    end

    __@FUNC@_debug "Plan action: $action"
    __@FUNC@_debug "Completions are: $__@FUNC@_comp_results"

    switch $action
        case abort
            __@FUNC@_debug "Received error directive: aborting."
            return 0
        case complete
            if test $fallback -eq 1
                __@FUNC@_debug "Requesting file completion"
                return 1
            end
            return 0
    end

    # Might as well do file completion, in case it helps
    return 1
end

# Since Fish completions are only loaded once the user triggers them, we trigger them ourselves
# so we can properly delete any completions provided by another script.
# The space after the program name is essential to trigger completion for the program
# and not completion of the program name itself.
complete --do-complete "@PROGRAM@ " > /dev/null 2>&1

# Remove any pre-existing completions for the program since we will be handling all of them.
complete -c @PROGRAM@ -e

# The call to __@FUNC@_prepare_completions will setup __@FUNC@_comp_results
# which provides the program's completion choices.
complete -c @PROGRAM@ -n '__@FUNC@_prepare_completions' -f -a '$__@FUNC@_comp_results'
"#;
