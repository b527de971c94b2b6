//! Stream coordinates carried on every token and, later, every constructed
//! value, so error reports and tree nodes can always point back at the
//! exact byte/segment/element/component they came from.

/// A `(stream-offset, segment-index, element-index, component-index)`
/// quadruple.
///
/// `element_index` and `component_index` are `None` when the position names
/// a whole segment (or a whole element that has no components).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    /// Byte offset of the segment's first byte within the original stream.
    pub stream_offset: usize,
    /// 0-based index of the segment within the document.
    pub segment_index: usize,
    /// 0-based index of the element within the segment, if applicable.
    pub element_index: Option<usize>,
    /// 0-based index of the component within the element, if applicable.
    pub component_index: Option<usize>,
}

impl Position {
    pub fn segment(stream_offset: usize, segment_index: usize) -> Self {
        Self {
            stream_offset,
            segment_index,
            element_index: None,
            component_index: None,
        }
    }

    pub fn element(self, element_index: usize) -> Self {
        Self {
            element_index: Some(element_index),
            component_index: None,
            ..self
        }
    }

    pub fn component(self, component_index: usize) -> Self {
        Self {
            component_index: Some(component_index),
            ..self
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "segment #{} (byte {})", self.segment_index, self.stream_offset)?;
        if let Some(e) = self.element_index {
            write!(f, ", element {}", e)?;
        }
        if let Some(c) = self.component_index {
            write!(f, ", component {}", c)?;
        }
        Ok(())
    }
}
