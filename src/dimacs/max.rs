/*
 * Copyright (c) 2021-2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! The DIMACS max flow format.
//!
//! 1. empty lines and lines starting with `c` are ignored,
//! 2. the first line has the form `p max <n> <m>`,
//! 3. followed by the two node lines `n <node> s` and `n <node> t`
//!    (in any order) for the source and the sink,
//! 4. followed by exactly `m` arc lines `a <u> <v> <c>`.
//!
//! Nodes are numbered `1..=n` in the file and `0..n` in an [`Instance`].
//! Loops are not allowed, parallel arcs are (their capacities add up
//! when loaded).
//!
//! # Example
//!
//! ```
//! use rs_maxflow::dimacs;
//! use std::io::Cursor;
//!
//! let inst = dimacs::max::read(Cursor::new("p max 3 2\nn 1 s\nn 3 t\na 1 2 5\na 2 3 4\n")).unwrap();
//! let t = inst.triplets();
//! assert_eq!(rs_maxflow::dinic(&t.view(), inst.src, inst.snk), Ok(4));
//! ```

use super::{DimacsReader, Error, Result};
use crate::buffer::MatrixView;

use std::io::{Read, Write};

/// A max flow instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    /// The number of vertices.
    pub n: usize,
    /// The source vertex.
    pub src: usize,
    /// The sink vertex.
    pub snk: usize,
    /// The arcs `(u, v, capacity)`.
    pub arcs: Vec<(usize, usize, u64)>,
}

/// The arcs of an instance as coordinate buffers of a sparse matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triplets {
    pub n: usize,
    pub values: Vec<u64>,
    pub rows: Vec<u64>,
    pub cols: Vec<u64>,
}

impl Triplets {
    /// Return a sparse matrix view of the buffers.
    pub fn view(&self) -> MatrixView<'_> {
        MatrixView::sparse(&self.values, &self.rows, &self.cols, (self.n, self.n))
    }
}

impl Instance {
    /// Return the arcs as coordinate buffers.
    pub fn triplets(&self) -> Triplets {
        let mut t = Triplets {
            n: self.n,
            values: Vec::with_capacity(self.arcs.len()),
            rows: Vec::with_capacity(self.arcs.len()),
            cols: Vec::with_capacity(self.arcs.len()),
        };
        for &(u, v, c) in &self.arcs {
            t.rows.push(u as u64);
            t.cols.push(v as u64);
            t.values.push(c);
        }
        t
    }
}

/// Read an instance.
pub fn read<R: Read>(r: R) -> Result<Instance> {
    let mut reader = DimacsReader::new(r);

    let mut pline = reader.expect_line("p")?;
    pline.expect("max")?;
    let n: usize = pline.number()?;
    let m: usize = pline.number()?;
    pline.end()?;

    let mut src = None;
    let mut snk = None;
    for _ in 0..2 {
        let mut nline = reader.expect_line("n")?;
        let u: usize = nline.number()?;
        if u < 1 || u > n {
            return Err(Error::Data {
                line: nline.line,
                msg: format!("invalid node id {} (must be in 1..{})", u, n),
            });
        }
        let terminal = match nline.str()? {
            "s" => &mut src,
            "t" => &mut snk,
            what => {
                return Err(Error::Format {
                    line: nline.line,
                    msg: format!("invalid node type, must be 's' or 't', got: {}", what),
                })
            }
        };
        if terminal.replace(u - 1).is_some() {
            return Err(Error::Format {
                line: nline.line,
                msg: "duplicate terminal node".to_string(),
            });
        }
        nline.end()?;
    }

    let mut arcs = Vec::with_capacity(m);
    for _ in 0..m {
        let mut aline = reader.expect_line("a")?;
        let u: usize = aline.number()?;
        let v: usize = aline.number()?;
        let c: u64 = aline.number()?;
        aline.end()?;
        for &w in &[u, v] {
            if w < 1 || w > n {
                return Err(Error::Data {
                    line: aline.line,
                    msg: format!("invalid node id {} (must be in 1..{})", w, n),
                });
            }
        }
        if u == v {
            return Err(Error::Data {
                line: aline.line,
                msg: format!("invalid loop ({},{})", u, u),
            });
        }
        arcs.push((u - 1, v - 1, c));
    }

    if let Some(toks) = reader.read_line()? {
        return Err(Error::Format {
            line: toks.line,
            msg: format!("unexpected line at the end of file (expected exactly {} 'a' lines)", m),
        });
    }

    let (src, snk) = src.zip(snk).ok_or_else(|| Error::Format {
        line: reader.line_number,
        msg: "missing source or sink node".to_string(),
    })?;
    Ok(Instance { n, src, snk, arcs })
}

/// Read an instance from a named file.
pub fn read_from_file(filename: &str) -> Result<Instance> {
    read(std::fs::File::open(filename)?)
}

/// Write an instance.
pub fn write<W: Write>(mut w: W, instance: &Instance) -> std::io::Result<()> {
    writeln!(w, "p max {} {}", instance.n, instance.arcs.len())?;
    writeln!(w, "n {} s", instance.src + 1)?;
    writeln!(w, "n {} t", instance.snk + 1)?;
    for &(u, v, c) in &instance.arcs {
        writeln!(w, "a {} {} {}", u + 1, v + 1, c)?;
    }
    Ok(())
}

/// Write an instance to a named file.
pub fn write_to_file(filename: &str, instance: &Instance) -> std::io::Result<()> {
    write(std::fs::File::create(filename)?, instance)
}

#[cfg(test)]
mod tests {
    use crate::dimacs::{self, Error};
    use std::io::Cursor;

    const FILE: &str = "c this is a test file

p max 6 9
n 5 s
n 6 t

c there might be empty lines

a 5 1 10
a 5 2 10
a 1 2 2
a 1 3 4
a 1 4 8
a 2 4 9
a 3 6 10
a 4 3 6
a 4 6 10

c end of the file
";

    #[test]
    fn parse_file_test() {
        let inst = dimacs::max::read(Cursor::new(FILE)).unwrap();
        assert_eq!(inst.n, 6);
        assert_eq!(inst.src, 4);
        assert_eq!(inst.snk, 5);
        assert_eq!(inst.arcs.len(), 9);
        assert_eq!(inst.arcs[0], (4, 0, 10));
        assert_eq!(inst.arcs[8], (3, 5, 10));

        let t = inst.triplets();
        assert_eq!(t.rows[..3], [4, 4, 0]);
        assert_eq!(t.cols[..3], [0, 1, 1]);
        assert_eq!(t.values[..3], [10, 10, 2]);
    }

    #[test]
    fn write_test_file() {
        let inst = dimacs::Instance {
            n: 4,
            src: 0,
            snk: 3,
            arcs: vec![(0, 1, 4), (0, 2, 2), (1, 2, 2), (1, 3, 3), (2, 3, 5)],
        };
        let mut buf = Cursor::new(Vec::new());
        dimacs::max::write(&mut buf, &inst).unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert_eq!(text, "p max 4 5\nn 1 s\nn 4 t\na 1 2 4\na 1 3 2\na 2 3 2\na 2 4 3\na 3 4 5\n");
        assert_eq!(dimacs::max::read(Cursor::new(text)).unwrap(), inst);
    }

    #[test]
    fn reject_test() {
        for (text, line) in &[
            ("p min 2 1\n", 1),
            ("p max 2 1\nn 1 s\nn 1 s\n", 3),
            ("p max 2 1\nn 1 s\nn 2 t\na 1 1 3\n", 4),
            ("p max 2 1\nn 1 s\nn 2 t\na 1 3 3\n", 4),
            ("p max 2 1\nn 1 s\nn 2 t\na 1 2 3\na 2 1 3\n", 5),
        ] {
            match dimacs::max::read(Cursor::new(*text)) {
                Err(Error::Format { line: l, .. }) | Err(Error::Data { line: l, .. }) => assert_eq!(l, *line, "{}", text),
                other => panic!("unexpected result {:?} for {:?}", other, text),
            }
        }
    }
}
