use std::fmt;

/// Number of fields that exist regardless of headers (method, URL, body).
pub const FIXED_FIELD_COUNT: u16 = 3;

/// Address of one focusable field.
///
/// Method, URL and body are 0, 1 and 2. Header pair `i` occupies `3 + 2i`
/// (name) and `4 + 2i` (value). Submit is a sentinel outside that range; the
/// header list is capped well below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub u16);

impl FieldId {
    pub const METHOD: FieldId = FieldId(0);
    pub const URL: FieldId = FieldId(1);
    pub const BODY: FieldId = FieldId(2);
    pub const SUBMIT: FieldId = FieldId(u16::MAX);

    pub fn is_header(self, header_count: usize) -> bool {
        self.0 >= FIXED_FIELD_COUNT && self.0 < field_count(header_count)
    }

    /// Whether this id addresses an existing field.
    pub fn is_valid(self, header_count: usize) -> bool {
        self == FieldId::SUBMIT || self.0 < field_count(header_count)
    }

    /// Resolve the id against the current header list length.
    pub fn resolve(self, header_count: usize) -> Option<Field> {
        match self {
            FieldId::METHOD => Some(Field::MethodSelector),
            FieldId::URL => Some(Field::Url),
            FieldId::BODY => Some(Field::Body),
            FieldId::SUBMIT => Some(Field::Submit),
            id if id.is_header(header_count) => {
                let offset = (id.0 - FIXED_FIELD_COUNT) as usize;
                let index = offset / 2;
                Some(if offset % 2 == 0 {
                    Field::HeaderName(index)
                } else {
                    Field::HeaderValue(index)
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == FieldId::SUBMIT {
            write!(f, "submit({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// What kind of field an id resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MethodSelector,
    Url,
    Body,
    HeaderName(usize),
    HeaderValue(usize),
    Submit,
}

/// Which half of a header pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSlot {
    Name,
    Value,
}

/// Total number of contiguous field ids for `header_count` pairs.
pub fn field_count(header_count: usize) -> u16 {
    FIXED_FIELD_COUNT + 2 * header_count as u16
}

/// Id of one half of header pair `index`.
pub fn header_id(index: usize, slot: HeaderSlot) -> FieldId {
    let base = FIXED_FIELD_COUNT + 2 * index as u16;
    match slot {
        HeaderSlot::Name => FieldId(base),
        HeaderSlot::Value => FieldId(base + 1),
    }
}

/// Every field id in navigation order, submit last.
pub fn all_ids(header_count: usize) -> impl Iterator<Item = FieldId> {
    (0..field_count(header_count))
        .map(FieldId)
        .chain(std::iter::once(FieldId::SUBMIT))
}
