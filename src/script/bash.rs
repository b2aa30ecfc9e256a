//! Bash completion script

pub(super) const TEMPLATE: &str = r#"# bash completion for @PROGRAM@                           -*- shell-script -*-

__@FUNC@_debug()
{
    if [[ -n ${BASH_COMP_DEBUG_FILE:-} ]]; then
        echo "$*" >> "${BASH_COMP_DEBUG_FILE}"
    fi
}

# Macs have bash3 for which the bash-completion package doesn't include
# _init_completion. This is a minimal version of that function.
__@FUNC@_init_completion()
{
    COMPREPLY=()
    _get_comp_words_by_ref "$@" cur prev words cword
}

# Map the plan printed by `__complete-shell` onto COMPREPLY and compopt
__@FUNC@_apply_plan()
{
    local line action=""
    local -a filters=() infos=()
    local nospace=0 fallback=0

    while IFS='' read -r line; do
        case "$line" in
            "action "*) action=${line#action } ;;
            "opt nospace") nospace=1 ;;
            "opt fallback") fallback=1 ;;
            "arg "*) filters+=("${line#arg }") ;;
            "reply "*) COMPREPLY+=("${line#reply }") ;;
            "info "*) infos+=("${line#info }") ;;
        esac
    done <<< "$1"

    __@FUNC@_debug "Plan action: ${action}"

    case "$action" in
        abort)
            __@FUNC@_debug "Received error directive, no completion"
            if [[ $(type -t compopt) = "builtin" ]]; then
                compopt +o default
            fi
            ;;
        ext)
            local fullFilter filter
            for filter in "${filters[@]}"; do
                fullFilter+="$filter|"
            done
            __@FUNC@_debug "File filtering command: _filedir $fullFilter"
            _filedir "$fullFilter"
            ;;
        dirs)
            if [ ${#filters[@]} -ne 0 ]; then
                __@FUNC@_debug "Listing directories in ${filters[0]}"
                pushd "${filters[0]}" >/dev/null 2>&1 && _filedir -d && popd >/dev/null 2>&1 || return
            else
                __@FUNC@_debug "Listing directories in ."
                _filedir -d
            fi
            ;;
        complete)
            if [[ $(type -t compopt) = "builtin" ]]; then
                if [ $nospace -ne 0 ]; then
                    __@FUNC@_debug "Activating no space"
                    compopt -o nospace
                fi
                if [ $fallback -eq 0 ]; then
                    __@FUNC@_debug "Activating no file completion"
                    compopt +o default
                fi
            fi
            ;;
        *)
            __@FUNC@_debug "Using default file completion"
            ;;
    esac

    # Print the info statements before we finish
    if [ ${#infos[@]} -ne 0 ]; then
        printf "\n"
        printf "%s\n" "${infos[@]}"
        printf "\n"
        # This needs bash 4.4
        printf "%s" "${PS1@P}${COMP_LINE[@]}"
    fi
}

__start_@FUNC@()
{
    local cur prev words cword

    COMPREPLY=()

    # Call _init_completion from the bash-completion package
    # to prepare the arguments properly
    if declare -F _init_completion >/dev/null 2>&1; then
        _init_completion -n "=:" || return
    else
        __@FUNC@_init_completion -n "=:" || return
    fi

    __@FUNC@_debug
    __@FUNC@_debug "========= starting completion logic =========="
    __@FUNC@_debug "cur is ${cur}, words[*] is ${words[*]}, #words[@] is ${#words[@]}, cword is $cword"

    local -a args=("${words[@]:0:$((cword + 1))}")
    local plan
    plan=$("${words[0]}" __complete-shell bash ${COLUMNS:+--columns=$COLUMNS} --word-breaks="$COMP_WORDBREAKS"@FLAGS@ -- "${args[@]}" 2>/dev/null) || return

    __@FUNC@_apply_plan "$plan"
}

if [[ $(type -t compopt) = "builtin" ]]; then
    complete -o default -F __start_@FUNC@ @PROGRAM@
else
    complete -o default -o nospace -F __start_@FUNC@ @PROGRAM@
fi

# ex: ts=4 sw=4 et filetype=sh
"#;

pub(super) const RENAMED_HOOK: &str = r#"
# Hook the command used to generate the completion script
# to the @PROGRAM@ completion function to handle the case where
# the user renamed the @PROGRAM@ binary
if [[ $(type -t compopt) = "builtin" ]]; then
    complete -o default -F __start_@FUNC@ @BINARY@
else
    complete -o default -o nospace -F __start_@FUNC@ @BINARY@
fi
"#;
