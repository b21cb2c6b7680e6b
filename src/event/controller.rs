//! Controller number tables. Several names share a number, so these are
//! plain constants rather than enums.

/// Control change controller numbers (the first data byte of `0xBn`).
#[allow(missing_docs)]
pub mod cc {
    pub const BANK_SELECT: u8 = 0x00;
    pub const MODULATION: u8 = 0x01;
    pub const BREATH: u8 = 0x02;
    pub const FOOT: u8 = 0x04;
    pub const PORTAMENTO_TIME: u8 = 0x05;
    pub const DTE_MSB: u8 = 0x06;
    pub const VOLUME: u8 = 0x07;
    pub const BALANCE: u8 = 0x08;
    pub const PAN: u8 = 0x0A;
    pub const EXPRESSION: u8 = 0x0B;
    pub const EFFECT_CONTROL_1: u8 = 0x0C;
    pub const EFFECT_CONTROL_2: u8 = 0x0D;
    pub const GENERAL_1: u8 = 0x10;
    pub const GENERAL_2: u8 = 0x11;
    pub const GENERAL_3: u8 = 0x12;
    pub const GENERAL_4: u8 = 0x13;
    pub const BANK_SELECT_LSB: u8 = 0x20;
    pub const MODULATION_LSB: u8 = 0x21;
    pub const BREATH_LSB: u8 = 0x22;
    pub const FOOT_LSB: u8 = 0x24;
    pub const PORTAMENTO_TIME_LSB: u8 = 0x25;
    pub const DTE_LSB: u8 = 0x26;
    pub const VOLUME_LSB: u8 = 0x27;
    pub const BALANCE_LSB: u8 = 0x28;
    pub const PAN_LSB: u8 = 0x2A;
    pub const EXPRESSION_LSB: u8 = 0x2B;
    pub const EFFECT_1_LSB: u8 = 0x2C;
    pub const EFFECT_2_LSB: u8 = 0x2D;
    pub const GENERAL_1_LSB: u8 = 0x30;
    pub const GENERAL_2_LSB: u8 = 0x31;
    pub const GENERAL_3_LSB: u8 = 0x32;
    pub const GENERAL_4_LSB: u8 = 0x33;
    pub const HOLD: u8 = 0x40;
    pub const PORTAMENTO_SWITCH: u8 = 0x41;
    pub const SOSTENUTO: u8 = 0x42;
    pub const SOFT_PEDAL: u8 = 0x43;
    pub const LEGATO: u8 = 0x44;
    pub const HOLD_2: u8 = 0x45;
    pub const SOUND_CONTROLLER_1: u8 = 0x46;
    pub const SOUND_CONTROLLER_2: u8 = 0x47;
    pub const SOUND_CONTROLLER_3: u8 = 0x48;
    pub const SOUND_CONTROLLER_4: u8 = 0x49;
    pub const SOUND_CONTROLLER_5: u8 = 0x4A;
    pub const SOUND_CONTROLLER_6: u8 = 0x4B;
    pub const SOUND_CONTROLLER_7: u8 = 0x4C;
    pub const SOUND_CONTROLLER_8: u8 = 0x4D;
    pub const SOUND_CONTROLLER_9: u8 = 0x4E;
    pub const SOUND_CONTROLLER_10: u8 = 0x4F;
    pub const GENERAL_5: u8 = 0x50;
    pub const GENERAL_6: u8 = 0x51;
    pub const GENERAL_7: u8 = 0x52;
    pub const GENERAL_8: u8 = 0x53;
    pub const PORTAMENTO_CONTROL: u8 = 0x54;
    /// Reverb send depth
    pub const RSD: u8 = 0x5B;
    pub const EFFECT_1: u8 = 0x5B;
    pub const TREMOLO: u8 = 0x5C;
    pub const EFFECT_2: u8 = 0x5C;
    /// Chorus send depth
    pub const CSD: u8 = 0x5D;
    pub const EFFECT_3: u8 = 0x5D;
    pub const CELESTE: u8 = 0x5E;
    pub const EFFECT_4: u8 = 0x5E;
    pub const PHASER: u8 = 0x5F;
    pub const EFFECT_5: u8 = 0x5F;
    pub const DTE_INCREMENT: u8 = 0x60;
    pub const DTE_DECREMENT: u8 = 0x61;
    pub const NRPN_LSB: u8 = 0x62;
    pub const NRPN_MSB: u8 = 0x63;
    pub const RPN_LSB: u8 = 0x64;
    pub const RPN_MSB: u8 = 0x65;

    // channel mode messages
    pub const ALL_SOUND_OFF: u8 = 0x78;
    pub const RESET_ALL_CONTROLLERS: u8 = 0x79;
    pub const LOCAL_CONTROL: u8 = 0x7A;
    pub const ALL_NOTES_OFF: u8 = 0x7B;
    pub const OMNI_MODE_OFF: u8 = 0x7C;
    pub const OMNI_MODE_ON: u8 = 0x7D;
    pub const POLY_MODE_OFF: u8 = 0x7E;
    pub const POLY_MODE_ON: u8 = 0x7F;

    /// True for the channel mode range (120-127)
    pub const fn is_channel_mode(controller: u8) -> bool {
        controller >= ALL_SOUND_OFF && controller <= POLY_MODE_ON
    }
}

/// Registered parameter numbers (the LSB sent through [`cc::RPN_LSB`]).
#[allow(missing_docs)]
pub mod rpn {
    pub const PITCH_BEND_SENSITIVITY: u8 = 0;
    pub const FINE_TUNING: u8 = 1;
    pub const COARSE_TUNING: u8 = 2;
    pub const TUNING_PROGRAM: u8 = 3;
    pub const TUNING_BANK_SELECT: u8 = 4;
    pub const MODULATION_DEPTH: u8 = 5;
}

/// MIDI 2.0 per-note registered controllers.
#[allow(missing_docs)]
pub mod per_note_rcc {
    pub const MODULATION: u8 = 0x01;
    pub const BREATH: u8 = 0x02;
    pub const PITCH_7_25: u8 = 0x03;
    pub const VOLUME: u8 = 0x07;
    pub const BALANCE: u8 = 0x08;
    pub const PAN: u8 = 0x0A;
    pub const EXPRESSION: u8 = 0x0B;
    pub const SOUND_CONTROLLER_1: u8 = 0x46;
    pub const SOUND_CONTROLLER_2: u8 = 0x47;
    pub const SOUND_CONTROLLER_3: u8 = 0x48;
    pub const SOUND_CONTROLLER_4: u8 = 0x49;
    pub const SOUND_CONTROLLER_5: u8 = 0x4A;
    pub const SOUND_CONTROLLER_6: u8 = 0x4B;
    pub const SOUND_CONTROLLER_7: u8 = 0x4C;
    pub const SOUND_CONTROLLER_8: u8 = 0x4D;
    pub const SOUND_CONTROLLER_9: u8 = 0x4E;
    pub const SOUND_CONTROLLER_10: u8 = 0x4F;
    /// Reverb send level by default
    pub const EFFECT_1_DEPTH: u8 = 0x5B;
    pub const EFFECT_2_DEPTH: u8 = 0x5C;
    /// Chorus send level by default
    pub const EFFECT_3_DEPTH: u8 = 0x5D;
    pub const EFFECT_4_DEPTH: u8 = 0x5E;
    pub const EFFECT_5_DEPTH: u8 = 0x5F;
}

#[test]
fn channel_mode_range() {
    assert!(cc::is_channel_mode(cc::ALL_NOTES_OFF));
    assert!(cc::is_channel_mode(cc::POLY_MODE_ON));
    assert!(!cc::is_channel_mode(cc::RPN_MSB));
}
