use std::io::{self, BufRead, Write};

/// Asks twice; only `Y` (any case) both times counts as consent.
pub fn confirm_twice<R: BufRead, W: Write>(input: &mut R, output: &mut W, artifact: &str) -> io::Result<bool> {
    writeln!(output, "\"{artifact}\" has been written. Do you wish to continue? [Y/N]")?;
    if !read_yes(input)? {
        return Ok(false);
    }
    writeln!(output, "Are you SURE? [Y/N]")?;
    if !read_yes(input)? {
        writeln!(output, "Exiting...")?;
        return Ok(false);
    }
    writeln!(output, "Continuing...")?;
    Ok(true)
}

fn read_yes<R: BufRead>(input: &mut R) -> io::Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
