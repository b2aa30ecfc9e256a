//! PowerShell completion script

pub(super) const TEMPLATE: &str = r#"# powershell completion for @PROGRAM@                     -*- shell-script -*-

function __@FUNC@_debug {
    if ($env:BASH_COMP_DEBUG_FILE) {
        "$args" | Out-File -Append -FilePath "$env:BASH_COMP_DEBUG_FILE"
    }
}

Register-ArgumentCompleter -CommandName '@PROGRAM@' -ScriptBlock {
    param(
        $WordToComplete,
        $CommandAst,
        $CursorPosition
    )

    # Get the current command line and convert into a string
    $Command = $CommandAst.CommandElements
    $Command = "$Command"

    __@FUNC@_debug ""
    __@FUNC@_debug "========= starting completion logic =========="
    __@FUNC@_debug "WordToComplete: $WordToComplete Command: $Command CursorPosition: $CursorPosition"

    # The user could have moved the cursor backwards on the command-line.
    # Only the text up to the cursor matters.
    if ($Command.Length -gt $CursorPosition) {
        $Command = $Command.Substring(0, $CursorPosition)
    }

    $Words = @($Command -split '\s+' | Where-Object { $_ -ne '' })
    if ($WordToComplete -eq '') {
        $Words += ''
    }
    $Program = $Words[0]

    # Native commands drop empty arguments before PowerShell 7.3
    if ($PSVersionTable.PsVersion -lt [version]'7.3.0') {
        $Words = @($Words | ForEach-Object { if ($_ -eq '') { '""' } else { $_ } })
    }

    $Plan = & $Program __complete-shell powershell@FLAGS@ -- $Words 2>$null
    if ($LASTEXITCODE -ne 0) {
        __@FUNC@_debug "No completion plan, using file completion"
        return
    }

    $Action = ''
    $NoSpace = $false
    $Fallback = $false
    $Replies = @()
    foreach ($Line in $Plan) {
        if ($Line.StartsWith('action ')) {
            $Action = $Line.Substring(7)
        } elseif ($Line -eq 'opt nospace') {
            $NoSpace = $true
        } elseif ($Line -eq 'opt fallback') {
            $Fallback = $true
        } elseif ($Line.StartsWith('reply ')) {
            $Replies += $Line.Substring(6)
        } elseif ($Line.StartsWith('info ')) {
            __@FUNC@_debug "Info statement found: $($Line.Substring(5))"
        }
    }

    __@FUNC@_debug "Plan action: $Action"

    if ($Action -eq 'abort') {
        # Print an empty string so the shell does not start to complete paths
        ""
        return
    }

    if ($Action -ne 'complete' -or $Fallback) {
        __@FUNC@_debug "Using file completion"
        return
    }

    if ($Replies.Length -eq 0) {
        ""
        return
    }

    $Space = if ($NoSpace) { '' } else { ' ' }
    foreach ($Reply in $Replies) {
        $Text, $Description = $Reply.Split("`t", 2)
        if (-Not $Description) {
            $Description = ' '
        }
        [System.Management.Automation.CompletionResult]::new("$Text$Space", "$Text", 'ParameterValue', "$Description")
    }
}
"#;
