use std::fmt;

/// `HHMM[SS[dd]]`: hours and minutes mandatory, seconds and hundredths of
/// a second optional. `chrono::NaiveTime` is not used here because its
/// sub-second field is always present (defaulting to zero) and cannot
/// distinguish "seconds omitted" from "seconds given as :00".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: Option<u8>,
    pub hundredths: Option<u8>,
}

impl Time {
    pub fn parse(raw: &str) -> Option<Time> {
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let (hour, minute, second, hundredths) = match raw.len() {
            4 => (&raw[0..2], &raw[2..4], None, None),
            6 => (&raw[0..2], &raw[2..4], Some(&raw[4..6]), None),
            8 => (&raw[0..2], &raw[2..4], Some(&raw[4..6]), Some(&raw[6..8])),
            _ => return None,
        };
        let hour: u8 = hour.parse().ok()?;
        let minute: u8 = minute.parse().ok()?;
        let second: Option<u8> = second.map(|s| s.parse()).transpose().ok()?;
        let hundredths: Option<u8> = hundredths.map(|s| s.parse()).transpose().ok()?;
        if hour > 23 || minute > 59 || second.is_some_and(|s| s > 59) {
            return None;
        }
        Some(Time { hour, minute, second, hundredths })
    }

    pub fn wire_len(&self) -> usize {
        match (self.second, self.hundredths) {
            (None, _) => 4,
            (Some(_), None) => 6,
            (Some(_), Some(_)) => 8,
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hour, self.minute)?;
        if let Some(second) = self.second {
            write!(f, "{second:02}")?;
        }
        if let Some(hundredths) = self.hundredths {
            write!(f, "{hundredths:02}")?;
        }
        Ok(())
    }
}
