use anyhow::{bail, ensure, Context};
use bytes::{Buf, BufMut, BytesMut};

use crate::var_int::{VarInt, VarIntDecodeError};
use crate::{CompressionThreshold, Decode, Packet, MAX_PACKET_SIZE};

/// Splits an inbound byte stream into packet frames.
///
/// Bytes drained off the socket are queued with [`queue_slice`]; whole frames
/// come back out of [`try_next_packet`]. A partially received frame returns
/// `Ok(None)` and leaves the queued bytes untouched, so the caller simply
/// retries after the next socket read.
///
/// [`queue_slice`]: Self::queue_slice
/// [`try_next_packet`]: Self::try_next_packet
#[derive(Default)]
pub struct PacketDecoder {
    buf: BytesMut,
    decompress_buf: BytesMut,
    threshold: CompressionThreshold,
}

impl PacketDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_next_packet(&mut self) -> anyhow::Result<Option<PacketFrame>> {
        let mut r = &self.buf[..];

        let packet_len = match VarInt::decode_partial(&mut r) {
            Ok(len) => len,
            Err(VarIntDecodeError::Incomplete) => return Ok(None),
            Err(VarIntDecodeError::TooLarge) => bail!("malformed packet length VarInt"),
        };

        ensure!(
            (0..=MAX_PACKET_SIZE).contains(&packet_len),
            "packet length of {packet_len} is out of bounds"
        );

        if r.len() < packet_len as usize {
            // Not enough data arrived yet.
            return Ok(None);
        }

        let packet_len_len = VarInt(packet_len).written_size();

        let mut data;

        if self.threshold.is_enabled() {
            use std::io::Write;

            use flate2::write::ZlibDecoder;

            r = &r[..packet_len as usize];

            let data_len = VarInt::decode(&mut r)?.0;

            ensure!(
                (0..MAX_PACKET_SIZE).contains(&data_len),
                "decompressed packet length of {data_len} is out of bounds"
            );

            // A data length of zero means the body was sent raw.
            if data_len > 0 {
                ensure!(
                    data_len > self.threshold.0,
                    "decompressed packet length of {data_len} is <= the compression threshold of \
                     {}",
                    self.threshold.0
                );

                debug_assert!(self.decompress_buf.is_empty());

                self.decompress_buf.put_bytes(0, data_len as usize);

                let mut z = ZlibDecoder::new(&mut self.decompress_buf[..]);

                z.write_all(r)?;

                ensure!(
                    z.finish()?.is_empty(),
                    "decompressed packet length is shorter than expected"
                );

                let total_packet_len = VarInt(packet_len).written_size() + packet_len as usize;

                self.buf.advance(total_packet_len);

                data = self.decompress_buf.split();
            } else {
                debug_assert_eq!(data_len, 0);

                ensure!(
                    r.len() <= self.threshold.0 as usize,
                    "uncompressed packet length of {} exceeds compression threshold of {}",
                    r.len(),
                    self.threshold.0
                );

                let remaining_len = r.len();

                self.buf.advance(packet_len_len + 1);

                data = self.buf.split_to(remaining_len);
            }
        } else {
            self.buf.advance(packet_len_len);
            data = self.buf.split_to(packet_len as usize);
        }

        // Decode the leading packet id.
        r = &data[..];
        let packet_id = VarInt::decode(&mut r)
            .context("failed to decode packet id")?
            .0;

        data.advance(data.len() - r.len());

        Ok(Some(PacketFrame {
            id: packet_id,
            body: data,
        }))
    }

    pub fn compression(&self) -> CompressionThreshold {
        self.threshold
    }

    pub fn set_compression(&mut self, threshold: CompressionThreshold) {
        self.threshold = threshold;
    }

    pub fn queue_bytes(&mut self, bytes: BytesMut) {
        self.buf.unsplit(bytes);
    }

    pub fn queue_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of queued bytes not yet drained into frames.
    pub fn queued_len(&self) -> usize {
        self.buf.len()
    }

    pub fn take_capacity(&mut self) -> BytesMut {
        self.buf.split_off(self.buf.len())
    }

    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }
}

/// One decoded packet frame: the id and the body bytes after it.
#[derive(Clone, Debug)]
pub struct PacketFrame {
    pub id: i32,
    pub body: BytesMut,
}

impl PacketFrame {
    /// Decodes this frame as packet type `P`. Errors if the id does not
    /// match, the body fails to decode, or input is left over.
    pub fn decode<'a, P>(&'a self) -> anyhow::Result<P>
    where
        P: Packet + Decode<'a>,
    {
        ensure!(
            P::ID == self.id,
            "packet id mismatch while decoding '{}': expected {}, got {}",
            P::NAME,
            P::ID,
            self.id
        );

        let mut r = &self.body[..];

        let pkt = P::decode(&mut r)?;

        ensure!(
            r.is_empty(),
            "missed {} bytes while decoding '{}'",
            r.len(),
            P::NAME
        );

        Ok(pkt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Encode;

    #[test]
    fn incomplete_frame_leaves_queue_untouched() {
        let mut dec = PacketDecoder::new();

        // Frame: length 5, id 0x0a, body [1, 2, 3, 4].
        let frame = [0x05, 0x0a, 1, 2, 3, 4];

        for split in 0..frame.len() {
            dec.queue_slice(&frame[..split]);
            assert!(dec.try_next_packet().unwrap().is_none(), "split at {split}");

            dec.queue_slice(&frame[split..]);
            let pkt = dec.try_next_packet().unwrap().unwrap();
            assert_eq!(pkt.id, 0x0a);
            assert_eq!(&pkt.body[..], &[1, 2, 3, 4]);
        }
    }

    #[test]
    fn interleaved_reads_and_writes_preserve_order() {
        // The byte-queue analogue of a wrapping ring buffer: drain ten bytes,
        // queue ten more, and the observed sequence must be unbroken.
        let mut dec = PacketDecoder::new();

        let frame_of = |bytes: &[u8]| {
            let mut buf = vec![];
            VarInt(bytes.len() as i32 + 1).encode(&mut buf).unwrap();
            VarInt(0x42).encode(&mut buf).unwrap();
            buf.extend_from_slice(bytes);
            buf
        };

        let mut observed = vec![];

        for chunk in (0u8..20).collect::<Vec<_>>().chunks(10) {
            dec.queue_slice(&frame_of(chunk));
            let pkt = dec.try_next_packet().unwrap().unwrap();
            observed.extend_from_slice(&pkt.body);
        }

        assert_eq!(observed, (0u8..20).collect::<Vec<_>>());
        assert_eq!(dec.queued_len(), 0);
    }
}
