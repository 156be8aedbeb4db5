//! Help popup content.

/// Lines for the `?` popup. The clipboard line only appears when the
/// capability is available.
pub fn help_text(clipboard: bool) -> Vec<String> {
    let mut lines: Vec<String> = [
        "remdu",
        " ↑,↓ or k,j to move",
        " →,l to enter",
        " ←,h to return",
        " c toggle counts",
        " g toggle graph",
        " a toggle average size in directory",
        " u toggle human-readable format",
        " n,s,C,A sort by name,size,count,average size",
        " d delete file/directory",
        " v select file/directory",
        " V enter visual select mode",
        " D delete selected files/directories",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if clipboard {
        lines.push(" y copy current path to clipboard".to_string());
    }
    lines.extend(
        [
            " Y display current path",
            " ^L refresh screen",
            " ? to toggle help on and off",
            " q/ESC/^c to quit",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    lines
}
