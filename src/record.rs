use serde::Serialize;
use thiserror::Error;

/// Token used by the upstream search to mark a query without any database hit.
pub const NO_HIT_TOKEN: &str = "*";

/// Label substituted for both the accession and the lineage of a no-hit line.
pub const NO_HIT: &str = "No_hit";

/// One parsed line of a `hits.*` table.
///
/// The abundance is kept as the raw string sliced out of the amplicon field:
/// it is only ever written back out verbatim, and re-formatting it (e.g.
/// `007` -> `7`) would change the output.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub amplicon: String,
    pub abundance: String,
    pub identity: String,
    pub accession: String,
    pub lineage: Vec<String>,
}

impl HitRecord {
    /// Parses one raw line of a hits table.
    ///
    /// A line carries exactly three tab-separated fields:
    /// `<amplicon>_<abundance>`, an identity score (opaque, passed through
    /// unmodified), and a hit field which is either the no-hit token `*` or
    /// `<accession> <taxon|taxon|...>` separated by a single space.
    ///
    /// # Errors
    ///
    /// Returns a `ParseErr` quoting the offending raw text if the line does
    /// not split into three fields, the amplicon field has no `_` separator,
    /// or a hit field has no space between accession and taxonomy.
    pub fn parse(line: &str) -> Result<Self, ParseErr> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(ParseErr::FieldCount {
                line: line.to_string(),
                count: fields.len(),
            });
        }
        let (amplicon_field, identity, hit_field) = (fields[0], fields[1], fields[2]);

        // the abundance is encoded after the last underscore of the id
        let Some((amplicon, abundance)) = amplicon_field.rsplit_once('_') else {
            return Err(ParseErr::MissingAbundance {
                field: amplicon_field.to_string(),
            });
        };

        let (accession, lineage) = if hit_field == NO_HIT_TOKEN {
            (NO_HIT.to_string(), vec![NO_HIT.to_string()])
        } else {
            let Some((accession, taxonomy)) = hit_field.split_once(' ') else {
                return Err(ParseErr::MissingTaxonomy {
                    field: hit_field.to_string(),
                });
            };
            (
                accession.to_string(),
                taxonomy.split('|').map(String::from).collect(),
            )
        };

        Ok(HitRecord {
            amplicon: amplicon.to_string(),
            abundance: abundance.to_string(),
            identity: identity.to_string(),
            accession,
            lineage,
        })
    }
}

#[derive(Error, Debug)]
pub enum ParseErr {
    #[error(
        "expected 3 tab-separated fields, found {count}:
    `{line}`"
    )]
    FieldCount { line: String, count: usize },

    #[error(
        "amplicon field carries no `_` abundance separator:
    `{field}`"
    )]
    MissingAbundance { field: String },

    #[error(
        "hit field has no space between accession and taxonomy:
    `{field}`"
    )]
    MissingTaxonomy { field: String },
}

/// One consensus line of a `results.*` table, in output column order.
///
/// The lineage is already `|`-joined and the accessions `,`-joined; rows are
/// serialized through a tab-delimited writer.
#[derive(Debug, Serialize)]
pub struct ConsensusRow {
    pub amplicon: String,
    pub abundance: String,
    pub identity: String,
    pub lineage: String,
    pub accessions: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_regular_hit() {
        let rec = HitRecord::parse("amp1_5\t97.0\tAB123 Bacteria|Firmicutes|Bacillus").unwrap();
        assert_eq!(rec.amplicon, "amp1");
        assert_eq!(rec.abundance, "5");
        assert_eq!(rec.identity, "97.0");
        assert_eq!(rec.accession, "AB123");
        assert_eq!(rec.lineage, vec!["Bacteria", "Firmicutes", "Bacillus"]);
    }

    #[test]
    fn no_hit_token_becomes_the_sentinel() {
        let rec = HitRecord::parse("amp2_3\t99.0\t*").unwrap();
        assert_eq!(rec.accession, NO_HIT);
        assert_eq!(rec.lineage, vec![NO_HIT]);
    }

    #[test]
    fn abundance_is_sliced_from_the_last_underscore() {
        let rec = HitRecord::parse("amp_one_12\t90.1\t*").unwrap();
        assert_eq!(rec.amplicon, "amp_one");
        assert_eq!(rec.abundance, "12");
    }

    #[test]
    fn rejects_wrong_field_counts() {
        assert!(matches!(
            HitRecord::parse("amp1_5\t97.0"),
            Err(ParseErr::FieldCount { count: 2, .. })
        ));
        assert!(matches!(
            HitRecord::parse("amp1_5\t97.0\tAB123 Bacteria\textra"),
            Err(ParseErr::FieldCount { count: 4, .. })
        ));
        assert!(matches!(
            HitRecord::parse(""),
            Err(ParseErr::FieldCount { count: 1, .. })
        ));
    }

    #[test]
    fn rejects_an_amplicon_without_abundance() {
        assert!(matches!(
            HitRecord::parse("amp1\t97.0\t*"),
            Err(ParseErr::MissingAbundance { .. })
        ));
    }

    #[test]
    fn rejects_a_hit_without_taxonomy() {
        assert!(matches!(
            HitRecord::parse("amp1_5\t97.0\tAB123"),
            Err(ParseErr::MissingTaxonomy { .. })
        ));
    }
}
