//! Streaming trace sinks.
//!
//! The [`TraceRecorder`] trait receives every observed change as the engine
//! records it. [`TextRecorder`] writes the plain `time, signal, value` form;
//! [`VcdRecorder`] writes an IEEE 1364 Value Change Dump that waveform viewers
//! such as GTKWave or Surfer can open.

use std::collections::HashMap;
use std::io::Write;

use gatesim_common::Bit;
use gatesim_netlist::SignalId;

use crate::error::SimError;
use crate::time::SimTime;

/// Trait for streaming simulation output.
pub trait TraceRecorder {
    /// Opens a scope (the circuit) before signals are registered.
    fn begin_scope(&mut self, _name: &str) -> Result<(), SimError> {
        Ok(())
    }

    /// Registers a signal that may appear in later changes.
    fn register_signal(&mut self, _id: SignalId, _name: &str) -> Result<(), SimError> {
        Ok(())
    }

    /// Closes the current scope.
    fn end_scope(&mut self) -> Result<(), SimError> {
        Ok(())
    }

    /// Records one value change.
    fn record_change(
        &mut self,
        time: SimTime,
        id: SignalId,
        name: &str,
        value: Bit,
    ) -> Result<(), SimError>;

    /// Flushes any buffered output.
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// Writes `time, signal, value` lines separated by `\n`, without a trailing newline.
pub struct TextRecorder<W: Write> {
    writer: W,
    lines: u64,
}

impl<W: Write> TextRecorder<W> {
    /// Creates a text recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Returns the number of lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }
}

impl<W: Write> TraceRecorder for TextRecorder<W> {
    fn record_change(
        &mut self,
        time: SimTime,
        _id: SignalId,
        name: &str,
        value: Bit,
    ) -> Result<(), SimError> {
        if self.lines > 0 {
            self.writer.write_all(b"\n")?;
        }
        write!(self.writer, "{time}, {name}, {value}")?;
        self.lines += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// VCD (Value Change Dump) recorder following IEEE 1364.
///
/// All registered signals are dumped as 1-bit wires with value 0 at `#0`,
/// then every recorded change follows under its timestamp.
pub struct VcdRecorder<W: Write> {
    writer: W,
    timescale: String,
    id_map: HashMap<SignalId, String>,
    order: Vec<SignalId>,
    header_written: bool,
    dump_started: bool,
    current_time: Option<SimTime>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a VCD recorder with a `1ns` timescale.
    pub fn new(writer: W) -> Self {
        Self::with_timescale(writer, "1ns")
    }

    /// Creates a VCD recorder with the given timescale (e.g. `"10ps"`).
    pub fn with_timescale(writer: W, timescale: impl Into<String>) -> Self {
        Self {
            writer,
            timescale: timescale.into(),
            id_map: HashMap::new(),
            order: Vec::new(),
            header_written: false,
            dump_started: false,
            current_time: None,
        }
    }

    fn write_header(&mut self) -> Result<(), SimError> {
        if !self.header_written {
            write!(
                self.writer,
                "$version\n  gatesim\n$end\n$timescale\n  {}\n$end\n",
                self.timescale
            )?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Closes the definitions and writes initial values for every signal.
    fn start_dump(&mut self) -> Result<(), SimError> {
        if self.dump_started {
            return Ok(());
        }
        self.write_header()?;
        write!(self.writer, "$enddefinitions $end\n#0\n$dumpvars\n")?;
        for id in &self.order {
            writeln!(self.writer, "0{}", self.id_map[id])?;
        }
        writeln!(self.writer, "$end")?;
        self.current_time = Some(SimTime::ZERO);
        self.dump_started = true;
        Ok(())
    }

    /// Short identifier for the `n`th registered signal: `!` through `~`,
    /// then two-character codes and so on (bijective base 94).
    fn id_code(mut n: usize) -> String {
        let mut code = String::new();
        loop {
            code.push(char::from(b'!' + (n % 94) as u8));
            n /= 94;
            if n == 0 {
                return code;
            }
            n -= 1;
        }
    }
}

impl<W: Write> TraceRecorder for VcdRecorder<W> {
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.write_header()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn register_signal(&mut self, id: SignalId, name: &str) -> Result<(), SimError> {
        self.write_header()?;
        let code = Self::id_code(self.order.len());
        writeln!(self.writer, "$var wire 1 {code} {name} $end")?;
        self.id_map.insert(id, code);
        self.order.push(id);
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(
        &mut self,
        time: SimTime,
        id: SignalId,
        name: &str,
        value: Bit,
    ) -> Result<(), SimError> {
        self.start_dump()?;
        if self.current_time != Some(time) {
            writeln!(self.writer, "#{time}")?;
            self.current_time = Some(time);
        }
        match self.id_map.get(&id) {
            Some(code) => writeln!(self.writer, "{value}{code}")?,
            None => {
                return Err(SimError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("signal '{name}' was not registered with the VCD recorder"),
                )))
            }
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        self.start_dump()?;
        self.writer.flush()?;
        Ok(())
    }
}
