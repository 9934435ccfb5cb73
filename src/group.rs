use crate::record::HitRecord;
use anyhow::Result;
use thiserror::Error;

/// All hits sharing one amplicon id, in input order.
///
/// `abundance` and `identity` are the values carried by the *first* record
/// seen for the amplicon; later records in the same group do not override
/// them (see `GroupReader`).
#[derive(Debug)]
pub struct Group {
    pub amplicon: String,
    pub abundance: String,
    pub identity: String,
    pub accessions: Vec<String>,
    pub lineages: Vec<Vec<String>>,
}

impl Group {
    fn open(record: HitRecord) -> Self {
        Group {
            amplicon: record.amplicon,
            abundance: record.abundance,
            identity: record.identity,
            accessions: vec![record.accession],
            lineages: vec![record.lineage],
        }
    }

    fn push(&mut self, record: HitRecord) {
        self.accessions.push(record.accession);
        self.lineages.push(record.lineage);
    }

    /// Number of hits collected for this amplicon.
    pub fn len(&self) -> usize {
        self.lineages.len()
    }
}

/// Streams `HitRecord`s into completed `Group`s, one boundary at a time.
///
/// The input must already be clustered by amplicon id: the reader closes a
/// group the moment the incoming id differs from the open one, holds no
/// state beyond that single open group, and never re-sorts. A file in which
/// an amplicon's lines are not contiguous therefore yields several groups
/// (and several output rows) for that amplicon.
pub struct GroupReader<I> {
    records: I,
    open: Option<Group>,
    strict: bool,
}

impl<I> GroupReader<I>
where
    I: Iterator<Item = Result<HitRecord>>,
{
    /// In strict mode, a record whose abundance or identity disagrees with
    /// the first-seen values of its group is an error rather than being
    /// silently absorbed.
    pub fn new(records: I, strict: bool) -> Self {
        GroupReader {
            records,
            open: None,
            strict,
        }
    }
}

impl<I> Iterator for GroupReader<I>
where
    I: Iterator<Item = Result<HitRecord>>,
{
    type Item = Result<Group>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            let record = match record {
                Ok(r) => r,
                Err(e) => return Some(Err(e)),
            };

            match self.open.as_mut() {
                None => self.open = Some(Group::open(record)),
                Some(group) if group.amplicon == record.amplicon => {
                    if self.strict
                        && (group.abundance != record.abundance
                            || group.identity != record.identity)
                    {
                        return Some(Err(GroupErr::DivergentGroup {
                            amplicon: record.amplicon,
                            abundance: record.abundance,
                            identity: record.identity,
                            first_abundance: group.abundance.clone(),
                            first_identity: group.identity.clone(),
                        }
                        .into()));
                    }
                    group.push(record);
                }
                Some(_) => {
                    // boundary: the open group is complete
                    let done = self.open.replace(Group::open(record));
                    return done.map(Ok);
                }
            }
        }

        // end of stream: flush whatever is still open
        self.open.take().map(Ok)
    }
}

#[derive(Error, Debug)]
pub enum GroupErr {
    #[error(
        "amplicon `{amplicon}` repeats with abundance/identity `{abundance}`/`{identity}`, \
         but its group opened with `{first_abundance}`/`{first_identity}`"
    )]
    DivergentGroup {
        amplicon: String,
        abundance: String,
        identity: String,
        first_abundance: String,
        first_identity: String,
    },
}
