//! Opportunistic reader for the microcontroller link. The UI timer calls
//! [`SerialLink::poll`] every 100 ms; it must never block, so it only drains
//! bytes the port already has and decodes a pair once two complete lines are
//! buffered.

use std::io::Read;
use std::time::Duration;

use carrito_common::serial::{decode_pair, PanelSample};

pub struct SerialLink {
    port: Box<dyn serialport::SerialPort>,
    pending: Vec<u8>,
}

impl SerialLink {
    pub fn open(path: &str, baud: u32) -> serialport::Result<Self> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(10))
            .open()?;
        Ok(Self {
            port,
            pending: Vec::new(),
        })
    }

    /// Drains available bytes and decodes at most one LED/distance pair.
    /// Transport errors are logged and swallowed; the next poll retries.
    pub fn poll(&mut self) -> Option<PanelSample> {
        match self.port.bytes_to_read() {
            Ok(0) => {}
            Ok(available) => {
                let mut chunk = vec![0u8; available as usize];
                match self.port.read(&mut chunk) {
                    Ok(count) => self.pending.extend_from_slice(&chunk[..count]),
                    Err(err) => log::error!("serial read failed: {err}"),
                }
            }
            Err(err) => {
                log::error!("serial port unavailable: {err}");
                return None;
            }
        }

        let (led_line, distance_line) = take_pair(&mut self.pending)?;
        let sample = decode_pair(&led_line, &distance_line);
        if sample.is_none() {
            log::warn!("discarding malformed pair: {led_line:?} / {distance_line:?}");
        }
        sample
    }
}

/// Pops the two oldest complete lines off `pending`, or `None` if a full
/// pair has not arrived yet. Trailing bytes of an unfinished line stay
/// buffered for the next poll.
fn take_pair(pending: &mut Vec<u8>) -> Option<(String, String)> {
    let first = pending.iter().position(|&b| b == b'\n')?;
    let second = first + 1 + pending[first + 1..].iter().position(|&b| b == b'\n')?;

    let rest = pending.split_off(second + 1);
    let pair = std::mem::replace(pending, rest);

    let led_line = String::from_utf8_lossy(&pair[..first]).into_owned();
    let distance_line = String::from_utf8_lossy(&pair[first + 1..second]).into_owned();
    Some((led_line, distance_line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_for_two_complete_lines() {
        let mut pending = b"3\n1".to_vec();
        assert_eq!(take_pair(&mut pending), None);
        assert_eq!(pending, b"3\n1");

        pending.extend_from_slice(b"7\n");
        assert_eq!(
            take_pair(&mut pending),
            Some(("3".into(), "17".into()))
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn keeps_the_tail_for_the_next_poll() {
        let mut pending = b"2\r\n10\r\n4".to_vec();
        let (led, distance) = take_pair(&mut pending).unwrap();
        assert_eq!(decode_pair(&led, &distance).unwrap().distance_cm, 10);
        assert_eq!(pending, b"4");
    }

    #[test]
    fn consumes_one_pair_per_call() {
        let mut pending = b"1\n5\n2\n10\n".to_vec();
        assert_eq!(take_pair(&mut pending), Some(("1".into(), "5".into())));
        assert_eq!(take_pair(&mut pending), Some(("2".into(), "10".into())));
        assert_eq!(take_pair(&mut pending), None);
    }

    #[test]
    fn malformed_pair_is_dropped_not_requeued() {
        let mut pending = b"oops\n17\n3\n20\n".to_vec();
        let (led, distance) = take_pair(&mut pending).unwrap();
        assert_eq!(decode_pair(&led, &distance), None);
        // The bad pair is gone; the next poll sees a clean one.
        let (led, distance) = take_pair(&mut pending).unwrap();
        assert_eq!(decode_pair(&led, &distance).unwrap().leds_on, 3);
    }
}
