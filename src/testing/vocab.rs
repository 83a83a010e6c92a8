//! Vocabulary files
//!
//! One token per line; extra tab-separated columns (ids, counts) are ignored.
//! Lines end at `\n` only, so a `\r` from CRLF files stays part of the line.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name of the fixture dictionary written by [`create_test_data`].
pub const TEST_DICT_FILE: &str = "dict.txt";

/// Mixed Latin/CJK tokens exercising multi-byte and punctuation handling.
pub const TEST_VOCAB: &[&str] = &[
    "[UNK]", "AT&T", "B超", "c#", "C#", "c++", "C++", "T恤", "A座", "A股",
    "A型", "A轮", "AA制", "AB型", "B座", "B股", "B型", "B轮", "BB机", "BP机",
    "C盘", "C座", "C语言", "CD盒", "CD机", "CALL机", "D盘", "D座", "D版", "E盘",
    "E座", "E化", "E通", "F盘", "F座", "G盘", "H盘", "H股", "I盘", "IC卡",
    "IP卡", "IP电话", "IP地址", "K党", "K歌之王", "N年", "O型", "PC机", "PH值", "SIM卡",
    "U盘", "VISA卡", "Z盘", "Q版", "QQ号", "RSS订阅", "T盘", "X光", "X光线", "X射线",
    "γ射线", "T恤衫", "T型台", "T台", "4S店", "4s店", "江南style", "江南Style", "1号店", "小S",
    "大S", "阿Q", "一", "一一", "一一二", "一一例", "一一分", "一一列举", "一一对", "一一对应",
    "一一记", "一一道来", "一丁", "一丁不识", "一丁点", "一丁点儿", "一七", "一七八不", "一万", "一万一千",
    "一万一千五百二十颗", "一万一千八百八十斤", "一万一千多间", "一万一千零九十五册", "一万七千", "一万七千余",
    "一万七千多", "一万七千多户", "一万万",
];

/// Read a vocabulary file, keeping the first tab-delimited column of each line.
pub fn get_vocab_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading vocabulary {}", path.display()), e))?;

    Ok(content
        .split_terminator('\n')
        .map(|line| line.split('\t').next().unwrap_or_default().to_string())
        .collect())
}

/// Write the fixture dictionary into `dir` and return its path.
pub fn create_test_data(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(TEST_DICT_FILE);
    let mut content = String::new();
    for token in TEST_VOCAB {
        content.push_str(token);
        content.push('\n');
    }
    fs::write(&path, content)
        .map_err(|e| Error::io(format!("writing {}", path.display()), e))?;
    Ok(path)
}
