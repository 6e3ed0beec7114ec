use crate::algorithm::FmmAlgorithm;
use crate::error::{FmmError, FmmResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Shape parameters encoded in an algorithm file name such as
/// `Strassen-222-7-18.txt` or `Moosbauer-226-21-mod2.exp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmShape {
    pub name: String,
    pub p: u32,
    pub k: usize,
    pub l: usize,
    pub m: usize,
    pub q: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Grey `.txt`: A rows, B rows, then C columns, one line each.
    Grey,
    /// Moosbauer `.m`: integer stream, one product at a time.
    MoosbauerM,
    /// Moosbauer `.exp`: one product expression per line.
    MoosbauerExp,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> FmmResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") => Ok(FileFormat::Grey),
            Some("m") => Ok(FileFormat::MoosbauerM),
            Some("exp") => Ok(FileFormat::MoosbauerExp),
            _ => Err(FmmError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

pub fn parse_file_name(path: &Path) -> FmmResult<AlgorithmShape> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FmmError::Parse(format!("no file name in '{}'", path.display())))?;
    let bad = |what: &str| FmmError::Parse(format!("{} in file name '{}'", what, file_name));

    // 1. Modulus from a "mod<d>" marker
    let p = match file_name.match_indices("mod").find_map(|(i, _)| {
        let digits: String = file_name[i + 3..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        (!digits.is_empty()).then_some(digits)
    }) {
        Some(digits) => digits.parse().map_err(|_| bad("invalid modulus"))?,
        None => 0,
    };

    // 2. Name, then single digit k, l, m
    let mut parts = file_name.splitn(4, '-');
    let name = parts.next().unwrap_or_default();
    let klm = parts.next().ok_or_else(|| bad("missing '-' delimiter"))?;
    let digits: Vec<usize> = klm
        .chars()
        .take(3)
        .filter_map(|c| c.to_digit(10).map(|d| d as usize))
        .collect();
    if digits.len() != 3 || digits.contains(&0) {
        return Err(bad("missing k, l, m digits"));
    }

    // 3. Product count between the second and third dash
    let q_text = parts.next().ok_or_else(|| bad("missing second '-' delimiter"))?;
    if parts.next().is_none() {
        return Err(bad("missing third '-' delimiter"));
    }
    let q: usize = q_text.parse().map_err(|_| bad("invalid product count"))?;
    if q == 0 {
        return Err(bad("zero product count"));
    }

    Ok(AlgorithmShape {
        name: name.to_string(),
        p,
        k: digits[0],
        l: digits[1],
        m: digits[2],
        q,
    })
}

/// Loads an algorithm from a `.txt`, `.m` or `.exp` file whose name encodes its shape.
pub fn load_algorithm<P: AsRef<Path>>(path: P, t_capacity: usize) -> FmmResult<FmmAlgorithm> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let shape = parse_file_name(path)?;
    debug!(?shape, ?format, "loading {}", path.display());

    let file = File::open(path)?;
    let alg = read_algorithm(file, format, &shape, t_capacity)?;
    info!(
        name = %alg.name,
        k = alg.k,
        l = alg.l,
        m = alg.m,
        q = alg.q,
        p = alg.p,
        "loaded algorithm from {}",
        path.display()
    );
    Ok(alg)
}

pub fn read_algorithm<R: Read>(
    reader: R,
    format: FileFormat,
    shape: &AlgorithmShape,
    t_capacity: usize,
) -> FmmResult<FmmAlgorithm> {
    let mut alg = FmmAlgorithm::new(
        &shape.name,
        shape.p,
        shape.k,
        shape.l,
        shape.m,
        shape.q,
        t_capacity,
    );
    match format {
        FileFormat::Grey => read_grey(reader, &mut alg)?,
        FileFormat::MoosbauerM => read_moosbauer_m(reader, &mut alg)?,
        FileFormat::MoosbauerExp => read_moosbauer_exp(reader, &mut alg)?,
    }
    Ok(alg)
}

/// Integer tokens in `text`: a run starting with `-` or a digit.
fn integers_in(text: &str) -> FmmResult<Vec<i32>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'-' || b.is_ascii_digit() {
            let start = i;
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let token = &text[start..i];
            if token != "-" {
                let n = token
                    .parse()
                    .map_err(|_| FmmError::Parse(format!("invalid integer '{}'", token)))?;
                out.push(n);
            }
        } else {
            i += 1;
        }
    }
    Ok(out)
}

/// Moosbauer files list C entries column by column.
#[inline(always)]
fn transposed_index(rows: usize, cols: usize, i: usize) -> usize {
    let r = i / rows;
    let c = i % rows;
    cols * c + r
}

fn read_grey<R: Read>(reader: R, alg: &mut FmmAlgorithm) -> FmmResult<()> {
    let (na, nb, nc, q) = (alg.na(), alg.nb(), alg.nc(), alg.q);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut data_line = 0;
    for result in rdr.records() {
        let rec = result?;
        let line = rec.position().map_or(0, |p| p.line());
        let mut values = Vec::with_capacity(q);
        for field in rec.iter() {
            values.extend(integers_in(field)?);
        }
        if values.is_empty() {
            continue;
        }
        if values.len() < q {
            return Err(FmmError::Parse(format!(
                "line {}: expected {} integers, found {}",
                line,
                q,
                values.len()
            )));
        }

        if data_line < na {
            for (i, &v) in values[..q].iter().enumerate() {
                alg.a.set(data_line, i, v);
            }
        } else if data_line < na + nb {
            for (i, &v) in values[..q].iter().enumerate() {
                alg.b.set(data_line - na, i, v);
            }
        } else if data_line < na + nb + nc {
            for (i, &v) in values[..q].iter().enumerate() {
                alg.c.set(i, data_line - na - nb, v);
            }
        } else {
            return Err(FmmError::Parse(format!(
                "line {}: more than {} data lines",
                line,
                na + nb + nc
            )));
        }
        data_line += 1;
    }

    if data_line != na + nb + nc {
        return Err(FmmError::Parse(format!(
            "expected {} data lines, found {}",
            na + nb + nc,
            data_line
        )));
    }
    Ok(())
}

fn read_moosbauer_m<R: Read>(mut reader: R, alg: &mut FmmAlgorithm) -> FmmResult<()> {
    let (na, nb, nc, q) = (alg.na(), alg.nb(), alg.nc(), alg.q);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let values = integers_in(&text)?;

    let per_product = na + nb + nc;
    let total = per_product * q;
    if values.len() < total {
        return Err(FmmError::Parse(format!(
            "expected {} integers, found {}",
            total,
            values.len()
        )));
    }

    for (prod, chunk) in values[..total].chunks_exact(per_product).enumerate() {
        let (a, rest) = chunk.split_at(na);
        let (b, c) = rest.split_at(nb);
        for (i, &v) in a.iter().enumerate() {
            alg.a.set(i, prod, v);
        }
        for (i, &v) in b.iter().enumerate() {
            alg.b.set(i, prod, v);
        }
        for (i, &v) in c.iter().enumerate() {
            alg.c.set(prod, transposed_index(alg.k, alg.m, i), v);
        }
    }
    Ok(())
}

/// One `[-][n*]x<r><c>` term of an `.exp` product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExpTerm {
    matrix: u8,
    coeff: i32,
    row: usize,
    col: usize,
}

fn parse_exp_line(line: &str) -> FmmResult<Vec<ExpTerm>> {
    let bytes = line.as_bytes();
    let mut terms = Vec::new();
    let mut prev = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !matches!(b, b'a' | b'b' | b'c') {
            i += 1;
            continue;
        }
        let (row, col) = match (bytes.get(i + 1), bytes.get(i + 2)) {
            (Some(r), Some(c)) if r.is_ascii_digit() && c.is_ascii_digit() => {
                ((r - b'0') as usize, (c - b'0') as usize)
            }
            _ => {
                return Err(FmmError::Parse(format!(
                    "term '{}' at column {} lacks a two digit index",
                    b as char,
                    i + 1
                )))
            }
        };

        let mut k: i32 = 0;
        let mut neg = false;
        for &p in &bytes[prev..i] {
            if p == b'-' {
                neg = true;
            } else if p.is_ascii_digit() {
                k = k
                    .checked_mul(10)
                    .and_then(|k| k.checked_add((p - b'0') as i32))
                    .ok_or_else(|| {
                        FmmError::Parse(format!(
                            "coefficient of term '{}' at column {} overflows",
                            b as char,
                            i + 1
                        ))
                    })?;
            }
        }
        if k == 0 {
            k = 1;
        }

        terms.push(ExpTerm {
            matrix: b,
            coeff: if neg { -k } else { k },
            row,
            col,
        });
        i += 3;
        prev = i;
    }
    Ok(terms)
}

fn read_moosbauer_exp<R: Read>(reader: R, alg: &mut FmmAlgorithm) -> FmmResult<()> {
    let (k, l, m) = (alg.k, alg.l, alg.m);
    let mut product = 0;

    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if product >= alg.q {
            return Err(FmmError::Parse(format!(
                "line {}: more than {} products",
                line_no + 1,
                alg.q
            )));
        }

        let terms = parse_exp_line(trimmed).map_err(|e| match e {
            FmmError::Parse(msg) => FmmError::Parse(format!("line {}: {}", line_no + 1, msg)),
            other => other,
        })?;
        for term in terms {
            let out_of_range = |limit_r: usize, limit_c: usize| {
                FmmError::Shape(format!(
                    "line {}: index {}{} of '{}' outside {}x{}",
                    line_no + 1,
                    term.row,
                    term.col,
                    term.matrix as char,
                    limit_r,
                    limit_c
                ))
            };
            let (r, c) = (term.row.wrapping_sub(1), term.col.wrapping_sub(1));
            match term.matrix {
                b'a' => {
                    if r >= k || c >= l {
                        return Err(out_of_range(k, l));
                    }
                    alg.a.set(l * r + c, product, term.coeff);
                }
                b'b' => {
                    if r >= l || c >= m {
                        return Err(out_of_range(l, m));
                    }
                    alg.b.set(m * r + c, product, term.coeff);
                }
                _ => {
                    if r >= m || c >= k {
                        return Err(out_of_range(m, k));
                    }
                    alg.c.set(product, transposed_index(k, m, k * r + c), term.coeff);
                }
            }
        }
        product += 1;
    }

    if product != alg.q {
        return Err(FmmError::Parse(format!(
            "expected {} product lines, found {}",
            alg.q, product
        )));
    }
    Ok(())
}
