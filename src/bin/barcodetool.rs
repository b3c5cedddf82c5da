use clap::{Parser, Subcommand, ValueEnum};
use rust_barcode::{
    AztecEncoder, AztecOptions, Correction, DataMatrix, ECLevel, Encodation, QrCode, ReedSolomonDecoder,
    ReedSolomonEncoder, StandardField,
};
use rand::Rng;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "barcodetool", version, about = "RustBarcode codeword tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text as Aztec codewords
    Aztec {
        text: String,
        /// Share of the symbol spent on parity (0-90)
        #[arg(long)]
        ec_percent: Option<u8>,
        /// Minimum layer count (1-32)
        #[arg(long)]
        layers: Option<u8>,
    },
    /// Encode text as QR codewords
    Qr {
        text: String,
        #[arg(long, default_value = "M")]
        level: ECLevel,
        /// Fixed version instead of the smallest fitting one
        #[arg(long)]
        version: Option<u8>,
    },
    /// Encode text as Data Matrix codewords
    Datamatrix {
        text: String,
        #[arg(long, value_enum, default_value_t = EncodationArg::C40)]
        encodation: EncodationArg,
    },
    /// Encode a random message, corrupt it and run the decoder
    Roundtrip {
        #[arg(long, value_enum, default_value_t = FieldArg::Qr)]
        field: FieldArg,
        #[arg(long, default_value_t = 20)]
        message: usize,
        #[arg(long, default_value_t = 10)]
        parity: usize,
        #[arg(long, default_value_t = 3)]
        errors: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodationArg {
    Ascii,
    C40,
    Text,
    X12,
}

impl From<EncodationArg> for Encodation {
    fn from(arg: EncodationArg) -> Self {
        match arg {
            EncodationArg::Ascii => Encodation::Ascii,
            EncodationArg::C40 => Encodation::C40,
            EncodationArg::Text => Encodation::Text,
            EncodationArg::X12 => Encodation::X12,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Qr,
    DataMatrix,
    Aztec6,
    Aztec8,
    Aztec10,
    Aztec12,
    AztecParam,
}

impl From<FieldArg> for StandardField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Qr => StandardField::Qr,
            FieldArg::DataMatrix => StandardField::DataMatrix,
            FieldArg::Aztec6 => StandardField::AztecData6,
            FieldArg::Aztec8 => StandardField::AztecData8,
            FieldArg::Aztec10 => StandardField::AztecData10,
            FieldArg::Aztec12 => StandardField::AztecData12,
            FieldArg::AztecParam => StandardField::AztecParam,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Aztec {
            text,
            ec_percent,
            layers,
        } => aztec_cmd(&text, ec_percent, layers),
        Command::Qr { text, level, version } => qr_cmd(&text, level, version),
        Command::Datamatrix { text, encodation } => datamatrix_cmd(&text, encodation.into()),
        Command::Roundtrip {
            field,
            message,
            parity,
            errors,
        } => roundtrip_cmd(field.into(), message, parity, errors),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn join<T: std::fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn aztec_cmd(text: &str, ec_percent: Option<u8>, layers: Option<u8>) -> Result<(), String> {
    let mut options = AztecOptions::default();
    if let Some(percent) = ec_percent {
        options.error_correction_percent = percent;
    }
    options.layers = layers;

    let symbol = AztecEncoder::new()
        .encode(text.as_bytes(), &options)
        .map_err(|e| e.to_string())?;

    println!(
        "Aztec {}: {} layers, {}x{} modules, {}-bit words",
        if symbol.compact { "compact" } else { "full" },
        symbol.layers,
        symbol.size,
        symbol.size,
        symbol.bits_per_word
    );
    println!("  data words:   {}", symbol.data_words);
    println!("  parity words: {}", symbol.parity_words);
    println!("  mode message: {}", join(&symbol.mode_message.nibbles));
    println!("  codewords:    {}", join(&symbol.codewords));
    Ok(())
}

fn qr_cmd(text: &str, level: ECLevel, version: Option<u8>) -> Result<(), String> {
    let qr = match version {
        Some(version) => QrCode::encode_with_version(text.as_bytes(), version, level),
        None => QrCode::encode(text.as_bytes(), level),
    }
    .map_err(|e| e.to_string())?;

    println!(
        "QR {}-{}: {}x{} modules, {} mode",
        qr.version,
        qr.ec_level,
        qr.size(),
        qr.size(),
        qr.mode.name()
    );
    println!("  data codewords: {}", qr.data_codewords);
    println!(
        "  codewords:      {}",
        join(qr.codewords.iter().map(|c| format!("{c:02X}")))
    );
    Ok(())
}

fn datamatrix_cmd(text: &str, encodation: Encodation) -> Result<(), String> {
    let dm = DataMatrix::encode(text.as_bytes(), encodation).map_err(|e| e.to_string())?;

    println!(
        "Data Matrix {}x{}: {} data + {} parity codewords in {} block(s)",
        dm.size(),
        dm.size(),
        dm.symbol.data_codewords,
        dm.symbol.ecc_codewords(),
        dm.symbol.blocks
    );
    println!(
        "  codewords: {}",
        join(dm.codewords.iter().map(|c| format!("{c:02X}")))
    );
    Ok(())
}

fn roundtrip_cmd(standard: StandardField, message_len: usize, parity: usize, errors: usize) -> Result<(), String> {
    let field = standard.field();
    if message_len + parity > field.order() {
        return Err(format!(
            "message + parity ({}) exceeds the field's {} nonzero elements",
            message_len + parity,
            field.order()
        ));
    }

    let mut rng = rand::rng();
    let message: Vec<u16> = (0..message_len)
        .map(|_| rng.random_range(0..field.size() as u32) as u16)
        .collect();
    let original = ReedSolomonEncoder::new(field, parity).encode(&message);

    let mut received = original.clone();
    let mut positions: Vec<usize> = (0..received.len()).collect();
    for i in 0..errors.min(received.len()) {
        let j = rng.random_range(i..positions.len());
        positions.swap(i, j);
        let flip = rng.random_range(1..field.size() as u32) as u16;
        received[positions[i]] ^= flip;
    }

    println!(
        "Field GF({}) generator {:#x}, {} message + {} parity words, {} errors injected",
        field.size(),
        field.generator(),
        message_len,
        parity,
        errors.min(received.len())
    );

    match ReedSolomonDecoder::new(field, parity).decode(&mut received) {
        Ok(Correction::Clean) => println!("  decoder: clean"),
        Ok(Correction::Repaired(n)) => println!("  decoder: repaired {n} positions"),
        Err(e) => println!("  decoder: {e}"),
    }
    println!(
        "  restored: {}",
        if received == original { "yes" } else { "no" }
    );
    Ok(())
}
