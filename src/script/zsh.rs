//! Zsh completion script

pub(super) const TEMPLATE: &str = r#"#compdef @PROGRAM@

# zsh completion for @PROGRAM@                            -*- shell-script -*-

__@FUNC@_debug()
{
    local file="$BASH_COMP_DEBUG_FILE"
    if [[ -n ${file} ]]; then
        echo "$*" >> "${file}"
    fi
}

_@FUNC@()
{
    local line action="" plan
    local -a args replies infos filters globs
    local nospace=0 fallback=0

    __@FUNC@_debug "\n========= starting completion logic =========="
    __@FUNC@_debug "CURRENT: ${CURRENT}, words[*]: ${words[*]}"

    # The user could have moved the cursor backwards on the command-line.
    # Only the words up to the cursor matter.
    args=("${(@)words[1,CURRENT]}")
    __@FUNC@_debug "Truncated words[*]: ${args[*]}"

    plan=$("${args[1]}" __complete-shell zsh ${COLUMNS:+--columns=$COLUMNS}@FLAGS@ -- "${args[@]}" 2>/dev/null)
    if [ $? -ne 0 ]; then
        __@FUNC@_debug "No completion plan, using file completion"
        _files
        return
    fi

    while IFS='' read -r line; do
        case "$line" in
            "action "*) action=${line#action } ;;
            "opt nospace") nospace=1 ;;
            "opt fallback") fallback=1 ;;
            "arg "*) filters+=("${line#arg }") ;;
            "reply "*) replies+=("${line#reply }") ;;
            "info "*) infos+=("${line#info }") ;;
        esac
    done <<< "$plan"

    __@FUNC@_debug "Plan action: ${action}"

    case "$action" in
        abort)
            __@FUNC@_debug "Received error directive, no completion"
            return 1
            ;;
        ext)
            local filter
            for filter in "${filters[@]}"; do
                # zsh requires a glob pattern to do file filtering
                globs+=(-g "*.${filter}")
            done
            __@FUNC@_debug "File filtering command: _files ${globs[*]}"
            _files "${globs[@]}"
            ;;
        dirs)
            if [ ${#filters[@]} -ne 0 ]; then
                __@FUNC@_debug "Listing directories in ${filters[1]}"
                _files -W "${filters[1]}" -/
            else
                __@FUNC@_debug "Listing directories in ."
                _files -/
            fi
            ;;
        complete)
            local info
            for info in "${infos[@]}"; do
                compadd -x "${info}"
            done

            if [ $fallback -ne 0 ]; then
                __@FUNC@_debug "No matching completion, using file completion"
                _files
            elif [ $nospace -ne 0 ]; then
                __@FUNC@_debug "Activating no space"
                _describe "completions" replies -S ''
            else
                _describe "completions" replies
            fi
            ;;
        *)
            _files
            ;;
    esac
}

# don't run the completion function when being sourced or eval-ed
if [ "$funcstack[1]" = "_@FUNC@" ]; then
    _@FUNC@
else
    compdef _@FUNC@ @PROGRAM@
fi
"#;

pub(super) const RENAMED_HOOK: &str = r#"
# Hook the command used to generate the completion script
# to the @PROGRAM@ completion function to handle the case where
# the user renamed the @PROGRAM@ binary
compdef _@FUNC@ @BINARY@
"#;
