//! Precomputed non-detectable-error probabilities.
//!
//! Evaluating [`non_detectable_error_probability`] from scratch walks a
//! double sum over every error count in the miscorrection band, which for
//! kilobyte-class codewords means millions of big-integer terms per call.
//! Solver loops that only vary the correction capability `t` re-derive the
//! same values every iteration, so this module ships them precomputed for
//! the reference regime: [`TABLE_DATA_BITS`] data bits per codeword at a
//! raw bit-error rate of [`TABLE_RBER`], with the codeword length implied
//! by each `t`.
//!
//! The clamped accessor mirrors how capacity planning uses the table: a
//! correction capability beyond the last row is strictly better than the
//! last row, so its entry is a safe upper bound. The strict accessor is
//! for callers that must not silently substitute one regime for another.
//!
//! [`non_detectable_error_probability`]: crate::chipkill::non_detectable_error_probability

use once_cell::sync::Lazy;
use tracing::warn;

use crate::error::{Error, Result};
use crate::precision::Probability;

/// Data bits per codeword the table was computed for.
pub const TABLE_DATA_BITS: u64 = 2048;

/// Raw bit-error rate the table was computed at.
pub const TABLE_RBER: f64 = 2e-4;

/// Largest correction capability with a tabulated entry.
pub const TABLE_MAX_CORRECTION: u64 = 23;

/// Bumped whenever the tabulated values are regenerated, so serialized
/// reports can state which table produced them.
pub const TABLE_REVISION: u32 = 1;

/// Non-detectable-error probability per correction capability, indexed by
/// `t`, at 100 significant digits.
const ENTRIES: [&str; 24] = [
    "0.3361114337235280921384355159552319115060088614390852881452605853103388383415188468684150512501252808",
    "0.2036438478559440347849597419006428461254044377173551437102454011733496950693404593429106096864512981",
    "0.01786764133507520478401718934640746856526549185451496209901468588544900855869794906287786711714065428",
    "0.0007607062373366267794531576607710063793455635747742779272294452969746959899997478036343465848296790470",
    "0.00001905998645679788765110229225647613976652062369186313417371987675993229976612709258075799611231144086",
    "3.145458985818853340971764318695412079959861235241652169586415127054332108728301184873650596267331136E-7",
    "3.681518426611429889043637904492652141229447264466413636469204335982310341680712650216100245152264514E-9",
    "3.219983540629905874033686011566974810528015074037924102372611579044757096463918384931123763987032969E-11",
    "2.187984170388904395784961693842440824781935116611404097469894347719289460286376410438065135642518648E-13",
    "1.190233209817337214156184021709291521054237395219233963110480364054888483529698835627207835121390534E-15",
    "5.308579527734330515280217976935556746657940122889695534688510662185338576809940003829453876849222772E-18",
    "1.979305770385003068965370810561645229804831220764037517124748283116376671727619593065672117517324660E-20",
    "6.269394424807362704809712474405356260722296336814470539691260834548646960470271513237177735035486261E-23",
    "1.710031612438866655299632919317331469597113586075601355131022731704659880858910660863299217063349800E-25",
    "4.063256314364930496692546671738595036282245585571803077487959330689460394042246289998563203076739960E-28",
    "8.495222703642112314046046938434281099094025081615000380985093177277298769310908287189267090931286226E-31",
    "1.576481363265481723545341250537895996747843033398460797575721259759380126435731590671378484957954278E-33",
    "2.616635869740421797189493061422252622653786410323139895642228742765843587794249850320826000548171957E-36",
    "3.910983818357039732662162703117395774031400595964016592448433725241343599206097656463793856764987836E-39",
    "5.295985105715212928526174097094802208817704588898348553745253156478195803265093730399950416548913948E-42",
    "6.532591835735009156093637973922057173859567239513449505568876035298388902267619444381301401015636737E-45",
    "7.376184494137079018349926095304774590238826912916241115137806529900759199530755668564548919648486994E-48",
    "7.658016266032558428052135715145242386778241615441549308619828308669082955874465253351872907650142191E-51",
    "7.340024334867337182936222140469734423989576838068997458901723369256354104393700765984242444556011988E-54",
];

static NDE_BY_CORRECTION: Lazy<Vec<Probability>> = Lazy::new(|| {
    ENTRIES
        .iter()
        .map(|literal| Probability::parse(literal).expect("embedded table literal"))
        .collect()
});

/// Looks up the tabulated non-detectable-error probability for correction
/// capability `t`.
///
/// # Returns
///
/// The tabulated probability, or [`Error::TableIndexOutOfRange`] beyond
/// [`TABLE_MAX_CORRECTION`].
pub fn non_detectable_error_from_table(t: u64) -> Result<Probability> {
    usize::try_from(t)
        .ok()
        .and_then(|index| NDE_BY_CORRECTION.get(index))
        .cloned()
        .ok_or(Error::TableIndexOutOfRange {
            t,
            max: TABLE_MAX_CORRECTION,
        })
}

/// Looks up the tabulated non-detectable-error probability, substituting
/// the last row for capabilities beyond the table and logging the clamp.
///
/// The last row overestimates the true probability of any stronger code,
/// so the substitution is conservative.
pub fn non_detectable_error_from_table_clamped(t: u64) -> Probability {
    if t > TABLE_MAX_CORRECTION {
        warn!(
            requested_t = t,
            clamped_t = TABLE_MAX_CORRECTION,
            "correction capability beyond tabulated range, using last row"
        );
        return NDE_BY_CORRECTION[TABLE_MAX_CORRECTION as usize].clone();
    }
    NDE_BY_CORRECTION[t as usize].clone()
}

// =============================================================================
// Tests
// =============================================================================
