/// Import path from the file at `from` to the file at `to`, both relative to
/// the same output root. Always uses `/`, and starts with `./` or `../`.
pub fn relative_path(from: &str, to: &str) -> String {
    let from_parts = components(from);
    let to_parts = components(to);

    let from_dir = &from_parts[..from_parts.len().saturating_sub(1)];
    let (to_dir, to_file) = match to_parts.split_last() {
        Some((file, dir)) => (dir, Some(*file)),
        None => (&to_parts[..], None),
    };

    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = std::iter::repeat_n("..", from_dir.len() - common).collect();
    segments.extend(&to_dir[common..]);
    segments.extend(to_file);

    let joined = segments.join("/");
    if joined.starts_with("../") || joined == ".." {
        joined
    } else {
        format!("./{joined}")
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}
