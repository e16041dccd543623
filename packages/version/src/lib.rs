use {
	std::cmp::Ordering,
	winnow::{
		ascii::digit1,
		combinator::{not, separated},
		prelude::*,
		token::rest,
	},
};

/// A build tool release version, such as `7.1.0`, `8.0.0rc2`, or `6.4.0-pre.20231219.1`.
///
/// The empty string parses to [`Version::EMPTY`], which orders after every other version.
#[derive(
	Clone, Debug, Eq, Hash, PartialEq, serde_with::DeserializeFromStr, serde_with::SerializeDisplay,
)]
pub struct Version {
	release: Vec<u64>,
	suffix: String,
	original: String,
}

#[derive(Clone, Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
	#[display("malformed version {version:?}")]
	MalformedVersion { version: String },
}

impl Version {
	pub const EMPTY: Self = Self {
		release: Vec::new(),
		suffix: String::new(),
		original: String::new(),
	};

	pub fn parse(string: &str) -> Result<Self, ParseError> {
		string.parse()
	}

	/// The dot separated integers at the start of the version.
	#[must_use]
	pub fn release(&self) -> &[u64] {
		&self.release
	}

	/// Everything after the release, possibly empty.
	#[must_use]
	pub fn suffix(&self) -> &str {
		&self.suffix
	}

	#[must_use]
	pub fn original(&self) -> &str {
		&self.original
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.original.is_empty()
	}

	#[must_use]
	pub fn is_prerelease_or_candidate(&self) -> bool {
		self.suffix.starts_with("-pre") || self.suffix.starts_with("rc")
	}

	fn cmp_emptiness(&self, other: &Self) -> Ordering {
		self.is_empty().cmp(&other.is_empty())
	}

	fn cmp_release(&self, other: &Self) -> Ordering {
		self.release.cmp(&other.release)
	}

	// All prerelease and candidate suffixes of a release are equal here. Telling -pre from rc,
	// or rc1 from rc2, needs a suffix grammar first.
	fn cmp_prerelease(&self, other: &Self) -> Ordering {
		other
			.is_prerelease_or_candidate()
			.cmp(&self.is_prerelease_or_candidate())
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.original)
	}
}

impl std::str::FromStr for Version {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::EMPTY);
		}
		let (release, suffix) = version.parse(s).map_err(|_| {
			tracing::trace!(version = %s, "failed to parse the version");
			ParseError::MalformedVersion {
				version: s.to_owned(),
			}
		})?;
		Ok(Self {
			release,
			suffix: suffix.to_owned(),
			original: s.to_owned(),
		})
	}
}

fn version<'a>(input: &mut &'a str) -> ModalResult<(Vec<u64>, &'a str)> {
	let release = separated::<_, _, Vec<_>, _, _, _, _>(
		1..,
		digit1.try_map(|digits: &str| digits.parse::<u64>()),
		".",
	);
	// A dot after the release is a missing or malformed component, not the start of a suffix.
	let (release, (), suffix) = (release, not("."), rest).parse_next(input)?;
	Ok((release, suffix))
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Versions are ordered by emptiness, then release, then whether they are a prerelease or candidate.
///
/// This order is coarser than equality. `1.0.0rc1` and `1.0.0-pre2` compare as equal but are not `==`.
/// A `BTreeSet` or `BTreeMap` keyed on `Version` keeps only one of such versions.
impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		self.cmp_emptiness(other)
			.then_with(|| self.cmp_release(other))
			.then_with(|| self.cmp_prerelease(other))
	}
}
