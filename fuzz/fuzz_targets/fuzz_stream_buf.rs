#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streambuf::StreamBuf;

/// One step of the single-writer/single-reader protocol.
#[derive(Arbitrary, Debug)]
enum Op<'a> {
    Write(&'a [u8]),
    Fill(&'a [u8]),
    AdvanceRead(u16),
    EraseRead(u16, u16),
    ReserveWrite(u16),
    Clear,
    Release,
    Take,
}

// Differential fuzz: drive a StreamBuf and a Vec<u8> model of the unconsumed
// region through the same operation sequence and require identical contents
// and consistent cursor arithmetic after every step.
fuzz_target!(|ops: Vec<Op<'_>>| {
    let mut buf = StreamBuf::new();
    let mut model: Vec<u8> = Vec::new();

    for op in &ops {
        match op {
            Op::Write(data) => {
                buf.write(data);
                model.extend_from_slice(data);
            }
            Op::Fill(data) => {
                let n = data.len().min(buf.write_remaining());
                buf.write_slice_mut()[..n].copy_from_slice(&data[..n]);
                assert_eq!(buf.advance_write(data.len()), n);
                model.extend_from_slice(&data[..n]);
            }
            Op::AdvanceRead(n) => {
                let n = usize::from(*n);
                let consumed = n.min(model.len());
                assert_eq!(buf.advance_read(n), consumed);
                model.drain(..consumed);
            }
            Op::EraseRead(offset, n) => {
                let (offset, n) = (usize::from(*offset), usize::from(*n));
                let erased = if offset < model.len() {
                    n.min(model.len() - offset)
                } else {
                    0
                };
                assert_eq!(buf.erase_read(offset, n), erased);
                if erased > 0 {
                    model.drain(offset..offset + erased);
                }
            }
            Op::ReserveWrite(n) => {
                buf.reserve_write(usize::from(*n));
                assert!(buf.write_remaining() >= usize::from(*n));
            }
            Op::Clear => {
                buf.clear();
                model.clear();
            }
            Op::Release => {
                buf.release();
                model.clear();
                assert_eq!(buf.capacity(), 0);
            }
            Op::Take => {
                let taken = buf.take();
                assert_eq!(buf.capacity(), 0);
                buf = taken;
            }
        }

        assert_eq!(buf.read_slice(), model.as_slice());
        assert!(buf.read_remaining() + buf.write_remaining() <= buf.capacity());
    }
});
