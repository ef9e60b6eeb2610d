//! Physical streams of a dictionary-encoded column.

use llkv_data_types::{Substream, SubstreamPath};

use crate::DictionaryEncodedType;

impl DictionaryEncodedType {
    /// Visits every stream a column of this type writes, dictionary streams
    /// first. `path` is the enclosing prefix and is restored on return.
    ///
    /// The dictionary side recurses into the element type under
    /// `DictionaryElements`; the index side recurses into the index type
    /// under `DictionaryIndexes`.
    pub fn enumerate_streams<F>(&self, visit: &mut F, path: &mut SubstreamPath)
    where
        F: FnMut(&SubstreamPath),
    {
        path.push(Substream::DictionaryElements);
        self.element_type().enumerate_streams(visit, path);
        path.replace_last(Substream::DictionaryIndexes);
        self.index_type().enumerate_streams(visit, path);
        path.pop();
    }

    /// All stream paths under `prefix`, in write order.
    pub fn stream_paths(&self, prefix: &SubstreamPath) -> Vec<SubstreamPath> {
        let mut out = Vec::new();
        let mut collect = |p: &SubstreamPath| out.push(p.clone());
        let mut path = prefix.clone();
        self.enumerate_streams(&mut collect, &mut path);
        out
    }
}

#[cfg(test)]
mod tests {
    use llkv_data_types::{DataType, stream_name};

    use super::*;

    #[test]
    fn plain_element_yields_two_streams() {
        let ty = DictionaryEncodedType::try_new(DataType::String, DataType::UInt8).unwrap();
        let paths = ty.stream_paths(&SubstreamPath::new());
        assert_eq!(
            paths,
            vec![
                SubstreamPath::from([Substream::DictionaryElements]),
                SubstreamPath::from([Substream::DictionaryIndexes]),
            ]
        );
        let names: Vec<String> = paths.iter().map(|p| stream_name("city", p)).collect();
        assert_eq!(names, vec!["city.dict", "city"]);
    }

    #[test]
    fn nested_prefix_is_kept_and_restored() {
        let ty = DictionaryEncodedType::try_new(
            DataType::nullable(DataType::UInt32),
            DataType::UInt16,
        )
        .unwrap();
        let prefix = SubstreamPath::from([Substream::ArrayElements]);
        let paths = ty.stream_paths(&prefix);
        assert_eq!(
            paths,
            vec![
                SubstreamPath::from([Substream::ArrayElements, Substream::DictionaryElements]),
                SubstreamPath::from([Substream::ArrayElements, Substream::DictionaryIndexes]),
            ]
        );

        let mut path = prefix.clone();
        ty.enumerate_streams(&mut |_: &SubstreamPath| {}, &mut path);
        assert_eq!(path, prefix);
    }
}
