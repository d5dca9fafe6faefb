// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

/// Line-buffering writer that scrubs credentials before forwarding output.
///
/// Redaction runs per complete line so a token split across two `write`
/// calls is still caught. A trailing partial line is scrubbed on flush/drop.
pub struct RedactingWriter<W: Write> {
	inner: W,
	buffer: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
	pub fn new(inner: W) -> Self {
		Self {
			inner,
			buffer: Vec::new(),
		}
	}

	fn write_redacted(&mut self, end: usize) -> io::Result<()> {
		{
			let chunk = String::from_utf8_lossy(&self.buffer[..end]);
			let redacted = mirrorsync_redact::redact(&chunk);
			self.inner.write_all(redacted.as_bytes())?;
		}
		self.buffer.drain(..end);
		Ok(())
	}
}

impl<W: Write> Drop for RedactingWriter<W> {
	fn drop(&mut self) {
		let _ = self.flush();
	}
}

impl<W: Write> Write for RedactingWriter<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.buffer.extend_from_slice(buf);

		while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
			self.write_redacted(newline_pos + 1)?;
		}

		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		if !self.buffer.is_empty() {
			let len = self.buffer.len();
			self.write_redacted(len)?;
		}
		self.inner.flush()
	}
}

/// Wraps another [`MakeWriter`] so that every writer it produces redacts.
pub struct RedactingMakeWriter<M> {
	inner: M,
}

impl<M> RedactingMakeWriter<M> {
	pub fn new(inner: M) -> Self {
		Self { inner }
	}
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
	M: MakeWriter<'a>,
{
	type Writer = RedactingWriter<M::Writer>;

	fn make_writer(&'a self) -> Self::Writer {
		RedactingWriter::new(self.inner.make_writer())
	}
}
