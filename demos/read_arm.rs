use std::thread::sleep;
use std::time::{Duration, Instant};

use log::{info, warn};

use yj10::prelude::*;

fn read_arm(arm: &mut Yj10Arm) -> Result<(), Error> {
    let time = Instant::now();
    arm.read_all_holding_regs()?;

    info!(
        "Read in {}ms. Joints={:?} Clamper(Current={}mA, State={})",
        time.elapsed().as_millis(),
        arm.joints(),
        arm.clamper_current(),
        arm.clamper()
    );

    for (index, pwm) in arm.joints().into_iter().enumerate() {
        if !registers::pwm_in_range(pwm) {
            warn!(
                "Joint {index} reports PWM {pwm}, outside {}..={}",
                registers::PWM_MIN,
                registers::PWM_MAX
            );
        }
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();

    // read_arm [DEVICE] [INSTRUCTION: 0 stop, 1 close, 2 open]
    let mut args = std::env::args().skip(1);
    let device = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let instruction = match args.next().as_deref() {
        Some("1") => ClamperInstruction::Close,
        Some("2") => ClamperInstruction::Open,
        _ => ClamperInstruction::Stop,
    };

    let mut arm = Yj10Arm::new(Yj10Settings::new(device).with_timeout(Duration::from_secs(1)))?;
    arm.connect()?;
    info!("Connected to {}", arm.settings());

    read_arm(&mut arm)?;

    arm.write_clamper_instruction(instruction)?;
    for _ in 0..5 {
        sleep(Duration::from_millis(100));
        read_arm(&mut arm)?;
    }

    arm.close();
    Ok(())
}
