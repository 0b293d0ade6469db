use anyhow::ensure;
use bytes::{BufMut, BytesMut};

use crate::var_int::VarInt;
use crate::{CompressionThreshold, Encode, Packet, MAX_PACKET_SIZE};

/// Builds framed outbound packets: VarInt length prefix, then the id and
/// body, zlib-compressed once the compression threshold is enabled and the
/// body is large enough.
#[derive(Default)]
pub struct PacketEncoder {
    buf: BytesMut,
    compress_buf: Vec<u8>,
    threshold: CompressionThreshold,
}

impl PacketEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_packet<P>(&mut self, pkt: &P) -> anyhow::Result<()>
    where
        P: Packet + Encode,
    {
        let start_len = self.buf.len();
        pkt.encode_with_id((&mut self.buf).writer())?;
        self.enframe_from(start_len)
    }

    /// Frames the bytes from `from` to the end of the buffer: prepends the
    /// packet length, and under compression the data length plus deflate.
    fn enframe_from(&mut self, from: usize) -> anyhow::Result<()> {
        let data_len = self.buf.len() - from;

        if self.threshold.is_enabled() {
            use std::io::Read;

            use flate2::bufread::ZlibEncoder;
            use flate2::Compression;

            if data_len > self.threshold.0 as usize {
                let mut z = ZlibEncoder::new(&self.buf[from..], Compression::new(4));

                self.compress_buf.clear();

                let data_len_size = VarInt(data_len as i32).written_size();

                let packet_len = data_len_size + z.read_to_end(&mut self.compress_buf)?;

                ensure!(
                    packet_len <= MAX_PACKET_SIZE as usize,
                    "packet exceeds maximum length"
                );

                drop(z);

                self.buf.truncate(from);

                let mut writer = (&mut self.buf).writer();

                VarInt(packet_len as i32).encode(&mut writer)?;
                VarInt(data_len as i32).encode(&mut writer)?;
                self.buf.extend_from_slice(&self.compress_buf);
            } else {
                let data_len_size = 1;
                let packet_len = data_len_size + data_len;

                ensure!(
                    packet_len <= MAX_PACKET_SIZE as usize,
                    "packet exceeds maximum length"
                );

                let packet_len_size = VarInt(packet_len as i32).written_size();

                let data_prefix_len = packet_len_size + data_len_size;

                self.buf.put_bytes(0, data_prefix_len);
                self.buf
                    .copy_within(from..from + data_len, from + data_prefix_len);

                let mut front = &mut self.buf[from..];

                VarInt(packet_len as i32).encode(&mut front)?;
                // Zero for no compression on this packet.
                VarInt(0).encode(front)?;
            }

            return Ok(());
        }

        let packet_len = data_len;

        ensure!(
            packet_len <= MAX_PACKET_SIZE as usize,
            "packet exceeds maximum length"
        );

        let packet_len_size = VarInt(packet_len as i32).written_size();

        self.buf.put_bytes(0, packet_len_size);
        self.buf
            .copy_within(from..from + data_len, from + packet_len_size);

        let front = &mut self.buf[from..];
        VarInt(packet_len as i32).encode(front)?;

        Ok(())
    }

    /// Takes all framed packets written so far, leaving the encoder empty.
    pub fn take(&mut self) -> BytesMut {
        self.buf.split()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn compression(&self) -> CompressionThreshold {
        self.threshold
    }

    pub fn set_compression(&mut self, threshold: CompressionThreshold) {
        self.threshold = threshold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, PacketDecoder};

    #[derive(PartialEq, Debug)]
    struct TestPacket {
        first: String,
        second: i64,
    }

    impl Packet for TestPacket {
        const ID: i32 = 0x07;
        const NAME: &'static str = "TestPacket";
    }

    impl Encode for TestPacket {
        fn encode(&self, mut w: impl std::io::Write) -> anyhow::Result<()> {
            self.first.encode(&mut w)?;
            self.second.encode(w)
        }
    }

    impl Decode<'_> for TestPacket {
        fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
            Ok(Self {
                first: String::decode(r)?,
                second: i64::decode(r)?,
            })
        }
    }

    fn check(dec: &mut PacketDecoder, expected: &TestPacket) {
        let frame = dec.try_next_packet().unwrap().unwrap();
        assert_eq!(&frame.decode::<TestPacket>().unwrap(), expected);
    }

    #[test]
    fn packets_round_trip_through_framing() {
        let small = TestPacket {
            first: "hello".into(),
            second: -99,
        };
        let large = TestPacket {
            first: "a".repeat(512),
            second: 1,
        };

        let mut enc = PacketEncoder::new();
        enc.append_packet(&small).unwrap();

        // Threshold of 64: `small` goes raw inside the compressed framing,
        // `large` gets deflated.
        enc.set_compression(CompressionThreshold(64));
        enc.append_packet(&small).unwrap();
        enc.append_packet(&large).unwrap();

        let bytes = enc.take();

        let mut dec = PacketDecoder::new();
        dec.queue_bytes(bytes);

        check(&mut dec, &small);
        dec.set_compression(CompressionThreshold(64));
        check(&mut dec, &small);
        check(&mut dec, &large);

        assert!(dec.try_next_packet().unwrap().is_none());
    }
}
