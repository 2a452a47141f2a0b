use super::getter::{ByteGetter, FILE_GETTER};
use super::{Connection, Kind};
use crate::error::ConnError;

impl Connection {
    /// Reads one line into `buffer`, returning the number of content bytes.
    ///
    /// At most `buffer.len() - 1` bytes are stored, followed by a NUL
    /// terminator. A longer line is split: the rest arrives on the next
    /// call. The line feed ending a line is consumed but not stored.
    ///
    /// Returns `Ok(None)` at end-of-stream when no byte was read. A final
    /// line without a line feed is returned as is.
    ///
    /// # Errors
    ///
    /// - [`ConnError::ZeroCapacity`] if `buffer` is empty.
    /// - [`ConnError::Unsupported`] on a string connection that still has
    ///   unread bytes. An exhausted string connection is closed and
    ///   reports end-of-stream.
    pub fn read_line(&mut self, buffer: &mut [u8]) -> Result<Option<usize>, ConnError> {
        if buffer.is_empty() {
            return Err(ConnError::ZeroCapacity);
        }

        match self.kind() {
            Kind::None => return Ok(None),
            Kind::String if self.remaining() == Some(0) => {
                self.close();
                return Ok(None);
            }
            Kind::String => {
                return Err(ConnError::Unsupported {
                    op: "read_line",
                    kind: Kind::String,
                });
            }
            Kind::File => {}
        }

        let limit = buffer.len() - 1;
        let mut len = 0;

        while len < limit {
            let Some(byte) = FILE_GETTER.get(self) else {
                if len == 0 {
                    return Ok(None);
                }
                break;
            };

            // Only a pushed-back '\r' gets here; the getter rewrites the rest.
            if byte == b'\r' {
                if let Some(next) = FILE_GETTER.get(self) {
                    if next != b'\n' {
                        self.push_back(next);
                    }
                }
                break;
            }

            if byte == b'\n' {
                break;
            }

            buffer[len] = byte;
            len += 1;
        }

        buffer[len] = 0;
        Ok(Some(len))
    }

    /// Like [`read_line`](Self::read_line), but allocates a buffer of
    /// `capacity` bytes and returns the line without its terminator.
    pub fn read_line_vec(&mut self, capacity: usize) -> Result<Option<Vec<u8>>, ConnError> {
        let mut buffer = vec![0u8; capacity];

        let line = self.read_line(&mut buffer)?.map(|len| {
            buffer.truncate(len);
            buffer
        });

        Ok(line)
    }
}
