use super::HeaderEntry;

/// Iterator over header name and value pairs.
///
/// This struct is created by [`Headers::iter`].
///
/// [`Headers::iter`]: super::Headers::iter
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    iter: std::slice::Iter<'a, HeaderEntry>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(entries: &'a [HeaderEntry]) -> Self {
        Self {
            iter: entries.iter(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|e| (e.name(), e.value()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> { }

/// Iterator over every value of a header name.
///
/// This struct is created by [`Headers::get_all`].
///
/// [`Headers::get_all`]: super::Headers::get_all
#[derive(Clone, Debug)]
pub struct GetAll<'a> {
    iter: std::slice::Iter<'a, HeaderEntry>,
    name: &'a str,
}

impl<'a> GetAll<'a> {
    pub(crate) fn new(entries: &'a [HeaderEntry], name: &'a str) -> Self {
        Self {
            iter: entries.iter(),
            name,
        }
    }
}

impl<'a> Iterator for GetAll<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.name;
        self.iter.find(|e| e.name() == name).map(HeaderEntry::value)
    }
}
