//! Destinations for emitted assembly lines.

use std::io::{self, BufWriter, Write};

/// Receives assembly lines in emission order.
pub trait AsmSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsmSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

impl<S: AsmSink + ?Sized> AsmSink for &mut S {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Buffered sink over any writer, one `\n`-terminated line per call.
pub struct AsmWriter<W: Write> {
    inner: BufWriter<W>,
    lines: usize,
}

impl<W: Write> AsmWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::new(writer),
            lines: 0,
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> AsmSink for AsmWriter<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<String> = Vec::new();
        sink.write_line("@SP").unwrap();
        sink.write_line("M=M+1").unwrap();
        assert_eq!(sink, vec!["@SP", "M=M+1"]);
    }

    #[test]
    fn test_writer_sink_terminates_lines() {
        let mut sink = AsmWriter::new(Vec::new());
        sink.write_line("(LOOP)").unwrap();
        sink.write_line("@LOOP").unwrap();
        assert_eq!(sink.lines_written(), 2);
        let bytes = sink.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "(LOOP)\n@LOOP\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_writer_sink_reports_failure_on_flush() {
        let mut sink = AsmWriter::new(Broken);
        sink.write_line("@SP").unwrap();
        assert!(AsmSink::flush(&mut sink).is_err());
    }
}
