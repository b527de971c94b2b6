use alloc::vec::Vec;

use crate::position::Position;
use crate::separators::{Separators, ISA_LENGTH};
use crate::token::{ElementShape, ElementTok, SegmentTok};
use crate::TokenizeError;

/// Lazy, finite, single-consumer sequence of [`SegmentTok`]s over a byte
/// buffer.
///
/// The first token recovers [`Separators`] from the ISA header; every
/// subsequent token is split using those separators. Once [`next`][^n]
/// returns a fatal [`TokenizeError::MalformedHeader`] the tokenizer is
/// exhausted and yields `None` from then on: there is no separators
/// configuration to continue with.
///
/// [^n]: `<Tokenizer as Iterator>::next`
pub struct Tokenizer<'a> {
    remaining: &'a [u8],
    consumed: usize,
    separators: Option<Separators>,
    segment_index: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            remaining: input,
            consumed: 0,
            separators: None,
            segment_index: 0,
            finished: false,
        }
    }

    /// Separators recovered so far; `None` until the ISA token has been
    /// produced.
    pub fn separators(&self) -> Option<Separators> {
        self.separators
    }

    fn advance(&mut self, n: usize) {
        self.remaining = &self.remaining[n..];
        self.consumed += n;
    }

    /// Skips newlines between segments and, once separators are known,
    /// stray empty frames produced by repeated segment terminators.
    fn skip_noise(&mut self) {
        loop {
            let skip = self
                .remaining
                .iter()
                .take_while(|&&b| b == b'\r' || b == b'\n')
                .count();
            if skip > 0 {
                self.advance(skip);
                continue;
            }
            if let Some(sep) = self.separators {
                if self.remaining.first() == Some(&sep.segment) {
                    self.advance(1);
                    continue;
                }
            }
            break;
        }
    }

    fn parse_isa(&mut self) -> Result<SegmentTok<'a>, TokenizeError> {
        let separators = Separators::infer(self.remaining)?;
        let offset = self.consumed;

        let id = &self.remaining[0..3];
        let body = &self.remaining[4..105];
        let elements = body
            .split(|&b| b == separators.element)
            .enumerate()
            .map(|(i, field)| ElementTok {
                repetitions: alloc::vec![ElementShape::Simple(field)],
                position: Position::segment(offset, 0).element(i),
            })
            .collect();

        let tok = SegmentTok {
            id,
            id_well_formed: true,
            elements,
            position: Position::segment(offset, 0),
        };

        self.separators = Some(separators);
        self.segment_index = 1;
        self.advance(ISA_LENGTH);
        Ok(tok)
    }

    fn parse_regular(&mut self) -> SegmentTok<'a> {
        let separators = self.separators.expect("separators recovered before regular segments");
        let offset = self.consumed;
        let segment_index = self.segment_index;

        let (frame, consumed_len) = match self.remaining.iter().position(|&b| b == separators.segment) {
            Some(i) => (&self.remaining[..i], i + 1),
            // Unterminated final segment: tolerated, consumes the rest of the buffer.
            None => (self.remaining, self.remaining.len()),
        };

        let id_end = frame
            .iter()
            .position(|&b| b == separators.element)
            .unwrap_or(frame.len());
        let id = &frame[..id_end];
        let id_well_formed = matches!(id.len(), 2 | 3)
            && id.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

        let elements_data: &[u8] = if id_end < frame.len() {
            &frame[id_end + 1..]
        } else {
            &[]
        };

        let elements = if elements_data.is_empty() && id_end == frame.len() {
            Vec::new()
        } else {
            elements_data
                .split(|&b| b == separators.element)
                .enumerate()
                .map(|(i, field)| {
                    let repetitions = field
                        .split(|&b| b == separators.repetition)
                        .map(|occurrence| {
                            let components: Vec<&[u8]> =
                                occurrence.split(|&b| b == separators.component).collect();
                            if components.len() == 1 {
                                ElementShape::Simple(components[0])
                            } else {
                                ElementShape::Composite(components)
                            }
                        })
                        .collect();
                    ElementTok {
                        repetitions,
                        position: Position::segment(offset, segment_index).element(i),
                    }
                })
                .collect()
        };

        self.segment_index += 1;
        self.advance(consumed_len);

        SegmentTok {
            id,
            id_well_formed,
            elements,
            position: Position::segment(offset, segment_index),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<SegmentTok<'a>, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.skip_noise();
        if self.remaining.is_empty() {
            self.finished = true;
            return None;
        }

        if self.separators.is_none() {
            return match self.parse_isa() {
                Ok(tok) => Some(Ok(tok)),
                Err(e) => {
                    self.finished = true;
                    Some(Err(e))
                }
            };
        }

        Some(Ok(self.parse_regular()))
    }
}

/// Tokenizes an entire in-memory buffer, collecting every [`SegmentTok`]
/// until exhaustion or a fatal [`TokenizeError`].
pub fn tokenize_all(input: &[u8]) -> Result<Vec<SegmentTok<'_>>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut tokenizer = Tokenizer::new(input);
    for item in &mut tokenizer {
        tokens.push(item?);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *231213*1430*^*00501*000000001*0*P*:~\
GS*HC*SENDER*RECEIVER*20231213*1430*1*X*005010X222A1~\
ST*837*0001*005010X222A1~\
SE*1*0001~\
GE*1*1~\
IEA*1*000000001~";

    #[test]
    fn tokenizes_minimal_interchange() {
        let tokens = tokenize_all(SAMPLE).unwrap();
        let ids: Vec<&str> = tokens.iter().map(|t| t.id_str().unwrap()).collect();
        assert_eq!(ids, vec!["ISA", "GS", "ST", "SE", "GE", "IEA"]);
        assert_eq!(tokens[0].elements.len(), 16);
    }

    #[test]
    fn recovers_separators_from_isa() {
        let mut tokenizer = Tokenizer::new(SAMPLE);
        let _ = tokenizer.next();
        let sep = tokenizer.separators().unwrap();
        assert_eq!(sep.element, b'*');
        assert_eq!(sep.segment, b'~');
        assert_eq!(sep.repetition, b'^');
    }

    #[test]
    fn fatal_on_malformed_header() {
        let bad = b"XSA*00*";
        let result = tokenize_all(bad);
        assert!(result.is_err());
    }

    #[test]
    fn tolerates_unterminated_final_segment() {
        let mut buf = SAMPLE.to_vec();
        buf.truncate(buf.len() - 1); // drop the final '~'
        let tokens = tokenize_all(&buf).unwrap();
        assert_eq!(tokens.last().unwrap().id_str(), Some("IEA"));
    }

    #[test]
    fn flags_malformed_segment_id() {
        let mut buf = SAMPLE.to_vec();
        let needle = b"GS*".to_vec();
        let pos = buf.windows(3).position(|w| w == needle.as_slice()).unwrap();
        buf[pos] = b'g'; // lowercase makes the id not well-formed
        let tokens = tokenize_all(&buf).unwrap();
        let gs = tokens.iter().find(|t| t.id_str() == Some("gS")).unwrap();
        assert!(!gs.id_well_formed);
    }

    #[test]
    fn splits_composite_elements() {
        let mut buf = SAMPLE.to_vec();
        // N1 segment with a composite element in the middle, terminated normally.
        let mut extra = b"N1*40*ACME CORP:ID123~".to_vec();
        let insert_at = buf.len() - "IEA*1*000000001~".len();
        let mut new_buf = buf[..insert_at].to_vec();
        new_buf.append(&mut extra);
        new_buf.extend_from_slice(&buf[insert_at..]);
        buf = new_buf;

        let tokens = tokenize_all(&buf).unwrap();
        let n1 = tokens.iter().find(|t| t.id == b"N1").unwrap();
        let composite = n1.element(2).unwrap();
        assert!(composite.shape().unwrap().as_components().is_some());
    }

    #[test]
    fn skips_newlines_between_segments() {
        let mut buf = Vec::new();
        buf.extend_from_slice(SAMPLE);
        // Insert a CRLF after the ISA terminator.
        let split_at = crate::separators::ISA_LENGTH;
        let mut spaced = buf[..split_at].to_vec();
        spaced.extend_from_slice(b"\r\n");
        spaced.extend_from_slice(&buf[split_at..]);
        let tokens = tokenize_all(&spaced).unwrap();
        assert_eq!(tokens.len(), 6);
    }
}
